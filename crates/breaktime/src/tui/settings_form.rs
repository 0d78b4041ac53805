//! Rows of the settings editor and their stepper ranges.

use breaktime_core::{BreakKind, SchedulerConfig, SettingKey, SettingValue};

/// Which way a stepper moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StepDirection {
    Up,
    Down,
}

/// Bounded stepper over a duration, counted in `unit_secs` units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Stepper {
    unit_secs: f64,
    unit_label: &'static str,
    min: f64,
    max: f64,
    step: f64,
}

impl Stepper {
    const fn minutes(min: f64, max: f64, step: f64) -> Self {
        Self {
            unit_secs: 60.0,
            unit_label: "min",
            min,
            max,
            step,
        }
    }

    const fn seconds(min: f64, max: f64, step: f64) -> Self {
        Self {
            unit_secs: 1.0,
            unit_label: "sec",
            min,
            max,
            step,
        }
    }

    /// Value after one step from `current_secs`, clamped to the range.
    pub(super) const fn apply(&self, current_secs: f64, direction: StepDirection) -> f64 {
        let units = current_secs / self.unit_secs;
        let next = match direction {
            StepDirection::Up => units + self.step,
            StepDirection::Down => units - self.step,
        };
        next.clamp(self.min, self.max) * self.unit_secs
    }

    pub(super) fn display(&self, secs: f64) -> String {
        format!("{:.0} {}", secs / self.unit_secs, self.unit_label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum FieldControl {
    Toggle,
    Stepper(Stepper),
}

/// One editable row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SettingsField {
    pub(super) label: &'static str,
    pub(super) track: BreakKind,
    pub(super) key: SettingKey,
    pub(super) control: FieldControl,
}

impl SettingsField {
    /// Whether the row accepts edits under `config`. Toggles always do.
    pub(super) const fn is_editable(&self, config: &SchedulerConfig) -> bool {
        match self.control {
            FieldControl::Toggle => true,
            FieldControl::Stepper(_) => config.track(self.track).enabled,
        }
    }

    pub(super) fn display(&self, config: &SchedulerConfig) -> String {
        match (self.control, config.value(self.key)) {
            (FieldControl::Toggle, SettingValue::Flag(true)) => "on".to_owned(),
            (FieldControl::Toggle, _) => "off".to_owned(),
            (FieldControl::Stepper(stepper), SettingValue::Seconds(secs)) => stepper.display(secs),
            (FieldControl::Stepper(_), SettingValue::Flag(_)) => String::new(),
        }
    }

    /// Value after stepping in `direction`, or `None` for toggles.
    pub(super) const fn stepped(
        &self,
        config: &SchedulerConfig,
        direction: StepDirection,
    ) -> Option<SettingValue> {
        let FieldControl::Stepper(stepper) = self.control else {
            return None;
        };
        let SettingValue::Seconds(current) = config.value(self.key) else {
            return None;
        };
        Some(SettingValue::Seconds(stepper.apply(current, direction)))
    }

    /// Flipped flag, or `None` for steppers.
    pub(super) const fn toggled(&self, config: &SchedulerConfig) -> Option<SettingValue> {
        match (self.control, config.value(self.key)) {
            (FieldControl::Toggle, SettingValue::Flag(on)) => Some(SettingValue::Flag(!on)),
            _ => None,
        }
    }
}

pub(super) const FIELDS: [SettingsField; 6] = [
    SettingsField {
        label: "Eye breaks (20-20-20 rule)",
        track: BreakKind::Eye,
        key: SettingKey::EyeBreakEnabled,
        control: FieldControl::Toggle,
    },
    SettingsField {
        label: "  Remind every",
        track: BreakKind::Eye,
        key: SettingKey::EyeBreakInterval,
        control: FieldControl::Stepper(Stepper::minutes(1.0, 120.0, 5.0)),
    },
    SettingsField {
        label: "  Break length",
        track: BreakKind::Eye,
        key: SettingKey::EyeBreakDuration,
        control: FieldControl::Stepper(Stepper::seconds(5.0, 120.0, 5.0)),
    },
    SettingsField {
        label: "Stretch breaks",
        track: BreakKind::Stretch,
        key: SettingKey::StretchBreakEnabled,
        control: FieldControl::Toggle,
    },
    SettingsField {
        label: "  Remind every",
        track: BreakKind::Stretch,
        key: SettingKey::StretchBreakInterval,
        control: FieldControl::Stepper(Stepper::minutes(5.0, 180.0, 5.0)),
    },
    SettingsField {
        label: "  Break length",
        track: BreakKind::Stretch,
        key: SettingKey::StretchBreakDuration,
        control: FieldControl::Stepper(Stepper::minutes(1.0, 15.0, 1.0)),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_secs(value: Option<SettingValue>, expected: f64) {
        match value {
            Some(SettingValue::Seconds(secs)) => {
                assert!((secs - expected).abs() < 1e-9, "expected {expected}, got {secs}");
            }
            other => panic!("expected seconds, got {other:?}"),
        }
    }

    #[test]
    fn steppers_move_by_step_and_clamp() {
        let eye_interval = Stepper::minutes(1.0, 120.0, 5.0);
        assert!((eye_interval.apply(1200.0, StepDirection::Up) - 1500.0).abs() < 1e-9);
        assert!((eye_interval.apply(7000.0, StepDirection::Up) - 7200.0).abs() < 1e-9);
        assert!((eye_interval.apply(180.0, StepDirection::Down) - 60.0).abs() < 1e-9);

        let eye_duration = Stepper::seconds(5.0, 120.0, 5.0);
        assert!((eye_duration.apply(5.0, StepDirection::Down) - 5.0).abs() < 1e-9);
        assert!((eye_duration.apply(20.0, StepDirection::Up) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_values_snap_into_range() {
        let config = SchedulerConfig::default();
        let stretch_length = FIELDS[5];
        // Default stretch length is 5 min; one step down is 4 min.
        assert_secs(stretch_length.stepped(&config, StepDirection::Down), 240.0);

        let mut long = config;
        long.stretch.duration_secs = 3600.0;
        assert_secs(stretch_length.stepped(&long, StepDirection::Down), 900.0);
    }

    #[test]
    fn rows_follow_track_enablement() {
        let mut config = SchedulerConfig::default();
        config.eye.enabled = false;
        assert!(FIELDS[0].is_editable(&config));
        assert!(!FIELDS[1].is_editable(&config));
        assert!(!FIELDS[2].is_editable(&config));
        assert!(FIELDS[4].is_editable(&config));
    }

    #[test]
    fn display_uses_field_units() {
        let config = SchedulerConfig::default();
        let shown: Vec<String> = FIELDS.iter().map(|field| field.display(&config)).collect();
        assert_eq!(shown, ["on", "20 min", "20 sec", "on", "60 min", "5 min"]);
    }

    #[test]
    fn toggles_and_steppers_answer_their_own_edits() {
        let config = SchedulerConfig::default();
        assert_eq!(FIELDS[3].toggled(&config), Some(SettingValue::Flag(false)));
        assert_eq!(FIELDS[3].stepped(&config, StepDirection::Up), None);
        assert_eq!(FIELDS[1].toggled(&config), None);
    }

    #[test]
    fn rows_cover_every_setting_once() {
        let keys: Vec<SettingKey> = FIELDS.iter().map(|field| field.key).collect();
        assert_eq!(keys, SettingKey::ALL);
    }
}
