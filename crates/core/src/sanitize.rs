use crate::re;

re!(re_noise, r"RRN:|Serial:|AcqId:|TranDate:|Value date:|Reference:|\b\d{4,}\b");

/// Strip reference markers, long numeric codes and `#` markers from a raw
/// description, then collapse whitespace.
///
/// Deletions are repeated until nothing changes, so a removal can never expose
/// a new marker and the function is idempotent.
pub fn sanitize_description(raw: &str) -> String {
    let mut current = collapse_whitespace(raw);
    loop {
        let next = collapse_whitespace(&strip_noise(&current));
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_noise(s: &str) -> String {
    let without_hash = s.replace('#', "");
    re_noise().replace_all(&without_hash, "").into_owned()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
