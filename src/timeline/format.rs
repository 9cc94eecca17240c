/// Format `seconds` as `H:MM:SS`, or `MM:SS` when under an hour.
///
/// Fractions are truncated; negative or non-finite input renders as `00:00`.
pub fn format_seconds(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let h = total / 3600;
    let m = total % 3600 / 60;
    let s = total % 60;

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}
