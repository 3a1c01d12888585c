pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Title-case every underscore separated word and join them:
/// `grant_file_protocol_extra_privileges` becomes
/// `GrantFileProtocolExtraPrivileges`. Within a word, a letter is upper-cased
/// when it does not follow another letter and lower-cased otherwise.
pub fn to_title_case(s: &str) -> String {
    s.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut prev_alpha = false;
            for c in word.chars() {
                if c.is_alphabetic() {
                    if prev_alpha {
                        out.extend(c.to_lowercase());
                    } else {
                        out.extend(c.to_uppercase());
                    }
                    prev_alpha = true;
                } else {
                    out.push(c);
                    prev_alpha = false;
                }
            }
            out
        })
        .collect()
}

pub fn accessor_name(fuse: &str) -> String {
    format!("Is{}Enabled", to_title_case(fuse))
}

/// A byte as a two digit C hex literal, e.g. `0x0a`.
pub fn c_hex(byte: u8) -> String {
    format!("0x{:02x}", byte)
}

pub fn hex_array(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| c_hex(b)).collect::<Vec<_>>().join(",")
}
