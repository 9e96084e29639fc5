/// Same naming rule the runtime applies to result columns: split on `_`,
/// upper-case the first character of each segment, prefix `set`.
pub(crate) fn mutator_name(column: &str) -> String {
    let mut name = String::from("set");

    for segment in column.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}
