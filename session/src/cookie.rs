/// Reads one cookie out of a `document.cookie` style string (`a=1; b=2`).
///
/// The value is only returned when `name=` occurs exactly once; a missing or
/// duplicated cookie yields `None`.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    let value = format!("; {cookies}");
    let parts: Vec<&str> = value.split(&format!("; {name}=")).collect();

    if parts.len() != 2 {
        return None;
    }

    parts[1].split(';').next().map(str::to_string)
}
