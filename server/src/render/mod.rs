use serde::Serialize;

mod animation;
mod map;

pub use animation::*;
pub use map::*;

/// Serializes a value for embedding in a `<script>` block.
pub(crate) fn script_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(err) => {
            tracing::error!("Failed to serialize page data: {}", err);
            "null".into()
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Grey notice block shown instead of a map when there is nothing to draw.
pub fn placeholder_html(message: &str) -> String {
    format!(
        r#"<div style="text-align:center;padding:20px;background-color:#f8f9fa;border-radius:5px;font-family:Arial,sans-serif;">
    <p>{}</p>
</div>"#,
        escape_html(message)
    )
}
