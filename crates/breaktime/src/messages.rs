//! Break overlay copy.

use breaktime_core::BreakKind;

const EYE_MESSAGES: &[&str] = &[
    "Look at something 20 feet away",
    "Give your eyes a well-deserved rest",
    "Focus on something in the distance",
    "Your eyes work hard, let them breathe",
    "Blink slowly and relax your gaze",
    "Stare out a window for a moment",
    "Let your vision soften and rest",
    "Close your eyes and take a deep breath",
];

const STRETCH_MESSAGES: &[&str] = &[
    "Stand up, move around, and stretch",
    "Roll your shoulders and loosen up",
    "Your body needs a change of position",
    "Take a short walk, even just around the room",
    "Stretch your arms above your head",
    "Do a few slow neck rolls",
    "Get some water while you're up",
    "Shake out your hands and wrists",
];

/// Overlay heading for a break.
pub const fn break_title(kind: BreakKind) -> &'static str {
    match kind {
        BreakKind::Eye => "Time to rest your eyes",
        BreakKind::Stretch => "Time to stretch!",
    }
}

/// Encouragement line for the `rotation`-th break of `kind`.
pub const fn pick(kind: BreakKind, rotation: usize) -> &'static str {
    let messages = match kind {
        BreakKind::Eye => EYE_MESSAGES,
        BreakKind::Stretch => STRETCH_MESSAGES,
    };
    messages[rotation % messages.len()]
}
