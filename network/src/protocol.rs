pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request bodies carry the user id on the first line and the command
/// markup on the rest.
pub fn frame_payload(user_id: &str, markup: &str) -> String {
    let mut body = String::with_capacity(user_id.len() + 1 + markup.len());
    body.push_str(user_id);
    body.push('\n');
    body.push_str(markup);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_puts_user_first() {
        assert_eq!(
            frame_payload("alice", "<end_turn skip=\"yes\"/>"),
            "alice\n<end_turn skip=\"yes\"/>"
        );
    }
}
