use std::path::Path;

use crate::fsutil::write_atomic;
use crate::timecode::format_timecode;
use crate::transcript::TranscriptSection;

/// Renders the interactive transcript page.
///
/// Each caption becomes an anchor carrying its absolute start time plus
/// `data-vtt-file` / `data-caption-idx` attributes, the identifiers the
/// precise edit mode sends back. Edits made against this page land on the
/// exact caption instead of relying on time matching.
pub fn render_html(title: &str, media_file: &str, sections: &[TranscriptSection]) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="generator" content="voxalign {version}">
<title>{title}</title>
<script>
function jumptoTime(time){{
    document.getElementsByTagName('video')[0].currentTime=time;
}}
</script>
<style>
body {{ font-family: sans-serif; background:#efe7dd; }}
.e {{ margin-bottom:10px; padding:5px 30px; border-radius:20px; }}
</style>
</head>
<body>
<video width="575" height="240" controls><source src="{media}" type="video/mp4"></video>
"#,
        version = env!("CARGO_PKG_VERSION"),
        title = escape(title),
        media = escape(media_file),
    ));

    for section in sections {
        html.push_str(&format!(
            "<div class=\"e\" style=\"background-color:{}\"><span style=\"color:{}\">{}</span><br>\n",
            escape(&section.style.bgcolor),
            escape(&section.style.textcolor),
            escape(&section.style.name),
        ));
        for caption in &section.captions {
            html.push_str(&format!(
                "<a href=\"#{anchor}\" data-vtt-file=\"{index}.vtt\" data-caption-idx=\"{caption_index}\" onclick=\"jumptoTime({seconds})\">{text}</a><br>\n",
                anchor = format_timecode(caption.start_ms),
                index = caption.segment_index,
                caption_index = caption.caption_index,
                seconds = caption.start_ms / 1000,
                text = escape(&caption.text),
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body></html>\n");
    html
}

/// Writes the rendered transcript atomically.
pub fn write_html(
    path: &Path,
    title: &str,
    media_file: &str,
    sections: &[TranscriptSection],
) -> std::io::Result<()> {
    write_atomic(path, render_html(title, media_file, sections).as_bytes())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
