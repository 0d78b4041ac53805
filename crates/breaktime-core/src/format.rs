//! Pure conversions from seconds to display values.

/// Render seconds as `M:SS`. Minutes are unpadded; negative input renders as `0:00`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Fraction of the break still remaining, in `[0, 1]`.
///
/// Interpolates inside the current second so the value reaches `ceil(remaining) / total`
/// exactly when the `M:SS` readout (which also uses `ceil`) changes.
#[must_use]
pub fn countdown_progress(remaining: f64, total: f64) -> f64 {
    if total.is_nan() || total <= 0.0 || !remaining.is_finite() {
        return 0.0;
    }
    let ceiled = remaining.max(0.0).ceil();
    let frac = ceiled - remaining.max(0.0);
    let from = ceiled / total;
    let to = (ceiled - 1.0).max(0.0) / total;
    (from + (to - from) * frac).clamp(0.0, 1.0)
}

/// Short label for a settings field: whole minutes when evenly divisible, seconds otherwise.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_minutes(seconds: f64) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).round() as u64
    } else {
        0
    };
    if whole >= 60 && whole % 60 == 0 {
        format!("{} min", whole / 60)
    } else {
        format!("{whole} sec")
    }
}
