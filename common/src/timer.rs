/// Formats elapsed recording time as `MM:SS`.
///
/// Minutes are not clamped, so an hour-long take reads `60:00`.
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
