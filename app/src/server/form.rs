//! The upload form page.

use axum::extract::State;
use axum::response::Html;
use chrono::{Local, NaiveDateTime};

use crate::app::SharedState;
use crate::config::AppConfig;

/// GET / – Render the stamp form
pub async fn index(State(state): State<SharedState>) -> Html<String> {
    let now = Local::now().naive_local();
    Html(render_form(state.config(), now))
}

/// Escape text for use inside an HTML attribute or element.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the form pre-filled from `config`, starting at `now`.
pub fn render_form(config: &AppConfig, now: NaiveDateTime) -> String {
    let font_path = config
        .font_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    PAGE_TEMPLATE
        .replace("{{max_width}}", &config.max_width.to_string())
        .replace("{{crop_px}}", &config.crop_height.to_string())
        .replace("{{start_date}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{start_time}}", &now.format("%H:%M:%S").to_string())
        .replace("{{font_path}}", &escape_html(&font_path))
        .replace("{{font_size}}", &config.font_size.to_string())
        .replace("{{max_font_size}}", &image_processor::MAX_FONT_SIZE.to_string())
        .replace("{{text_color}}", &escape_html(&config.text_color))
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Bulk Photo Crop &amp; Timestamp</title>
<style>
  body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
  fieldset { display: grid; grid-template-columns: 1fr 1fr; gap: .75rem; border: none; padding: 0; }
  label { display: flex; flex-direction: column; font-size: .9rem; }
  #message { min-height: 1.5rem; }
  #message.error { color: #b00020; }
</style>
</head>
<body>
<h1>Bulk Photo Crop &amp; Timestamp</h1>
<form id="stamp-form" enctype="multipart/form-data">
  <p><label>Upload JPG/PNG photos
    <input type="file" name="photos" accept=".jpg,.jpeg,.png" multiple></label></p>
  <fieldset>
    <label>Max width <input type="number" name="max_width" min="1" step="1" value="{{max_width}}"></label>
    <label>Start date <input type="date" name="start_date" value="{{start_date}}"></label>
    <label>Crop pixels from bottom <input type="number" name="crop_px" min="0" step="1" value="{{crop_px}}"></label>
    <label>Start time <input type="time" name="start_time" step="1" value="{{start_time}}"></label>
    <label>Font path (.ttf, empty for built-in) <input type="text" name="font_path" value="{{font_path}}"></label>
    <label>Font size <input type="number" name="font_size" min="1" max="{{max_font_size}}" step="1" value="{{font_size}}"></label>
    <label>Text color <input type="text" name="text_color" value="{{text_color}}"></label>
  </fieldset>
  <p><button type="submit">Process and Download ZIP</button></p>
  <p id="message"></p>
</form>
<script>
const form = document.getElementById("stamp-form");
const message = document.getElementById("message");
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const photos = form.querySelector('input[name="photos"]').files;
  if (photos.length === 0) {
    message.className = "";
    message.textContent = "Please upload at least one image.";
    return;
  }
  message.className = "";
  message.textContent = "Processing " + photos.length + " photo(s)...";
  try {
    const response = await fetch("/api/stamp", { method: "POST", body: new FormData(form) });
    if (!response.ok) {
      const body = await response.json().catch(() => ({ error: response.statusText }));
      message.className = "error";
      message.textContent = body.error || "Processing failed.";
      return;
    }
    const blob = await response.blob();
    const link = document.createElement("a");
    link.href = URL.createObjectURL(blob);
    link.download = "edited_photos.zip";
    link.textContent = "Download ZIP of Edited Photos";
    message.className = "";
    message.replaceChildren(link);
    link.click();
  } catch (err) {
    message.className = "error";
    message.textContent = String(err);
  }
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap()
    }

    #[test]
    fn form_is_prefilled_from_config() {
        let html = render_form(&AppConfig::default(), now());
        assert!(html.contains(r#"name="max_width" min="1" step="1" value="1054""#));
        assert!(html.contains(r#"name="crop_px" min="0" step="1" value="76""#));
        assert!(html.contains(r#"value="2025-01-02""#));
        assert!(html.contains(r#"value="03:04:05""#));
        assert!(html.contains(r#"name="font_size" min="1" max="1000" step="1" value="48""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn font_path_is_escaped() {
        let mut config = AppConfig::default();
        config.font_path = Some(r#"C:\Fonts\"evil".ttf"#.into());
        let html = render_form(&config, now());
        assert!(html.contains(r#"C:\Fonts\&quot;evil&quot;.ttf"#));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }
}
