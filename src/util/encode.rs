fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~')
}

pub(crate) fn aws_percent_encode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if is_unreserved(b) {
            out.push(b as char);
            continue;
        }

        out.push('%');
        out.push(hex_upper(b >> 4));
        out.push(hex_upper(b & 0x0F));
    }
    out
}

fn hex_upper(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        10..=15 => (b'A' + (nibble - 10)) as char,
        _ => '0',
    }
}

pub(crate) fn canonical_query_string(params: &[(String, String)]) -> String {
    let mut items = params
        .iter()
        .map(|(k, v)| (aws_percent_encode(k), aws_percent_encode(v)))
        .collect::<Vec<_>>();

    items.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut out = String::new();
    for (idx, (k, v)) in items.into_iter().enumerate() {
        if idx > 0 {
            out.push('&');
        }
        out.push_str(&k);
        out.push('=');
        out.push_str(&v);
    }
    out
}
