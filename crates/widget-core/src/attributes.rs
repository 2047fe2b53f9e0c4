//! Attribute name → state key mapping.
//!
//! `data-current-input` becomes `currentInput`; names without the prefix
//! are used verbatim.

pub fn attribute_state_key(name: &str, prefix: &str) -> String {
    let Some(rest) = name.strip_prefix(prefix) else {
        return name.to_string();
    };

    let mut key = String::with_capacity(rest.len());
    for (index, word) in rest.split('-').enumerate() {
        if index == 0 {
            key.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }
    key
}
