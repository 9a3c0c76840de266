use ammonia;

/// Sanitizes admin-authored free text (subject descriptions, question text)
/// before it is stored.
///
/// Whitelist based: harmless formatting tags such as <b> or <p> survive,
/// <script>/<iframe> elements (with their content) and event-handler
/// attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
