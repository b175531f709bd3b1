// src/utils/sanitize.rs

/// Strips unsafe markup from instructor-authored rich text (course
/// descriptions, lesson bodies) before it is stored.
///
/// Whitelist based: formatting tags like <b> and <p> survive, while <script>,
/// <iframe> and event-handler attributes are removed. Plain text passes through.
pub fn sanitize_rich_text(input: &str) -> String {
    ammonia::clean(input)
}
