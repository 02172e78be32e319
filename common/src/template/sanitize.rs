/// Derive the stack name from a service name
///
/// Drop everything that is neither alphanumeric nor a hyphen, capitalize every
/// hyphen-separated segment, join the segments and append `Stack`.
/// E.g. `order-api` becomes `OrderApiStack`.
pub fn stack_name(service_name: &str) -> String {
    let clean_name = service_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>();

    let mut name = clean_name
        .split('-')
        .map(capitalize)
        .collect::<String>();

    name.push_str("Stack");
    name
}

/// Upper case the first char, lower case the rest
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();

    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
