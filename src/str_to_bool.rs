/// Parse a strict boolean literal
/// (`1 t T TRUE true True` or `0 f F FALSE false False`), and nothing else.
pub fn str_to_bool(src: &str) -> Result<bool, String> {
    match src {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("invalid syntax".to_owned()),
    }
}
