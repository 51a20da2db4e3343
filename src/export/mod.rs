use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use tracing::info;

use crate::api::{Result, SessionError, Subscription};

const FILE_PREFIX: &str = "youtube-subscriptions";

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>YouTube Subscriptions</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: #f9f9f9;
        }
        .header {
            text-align: center;
            padding: 20px 0;
            background: white;
            border-radius: 8px;
            margin-bottom: 20px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .subscription-list {
            display: grid;
            gap: 15px;
        }
        .channel-card {
            display: flex;
            align-items: center;
            justify-content: space-between;
            padding: 15px;
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .channel-name {
            font-size: 16px;
            font-weight: 500;
            color: #333;
        }
        .subscribe-button {
            background: #cc0000;
            color: white;
            border: none;
            padding: 10px 20px;
            border-radius: 4px;
            cursor: pointer;
            font-weight: 500;
            text-decoration: none;
            transition: background-color 0.2s;
        }
        .subscribe-button:hover {
            background: #990000;
        }
        .timestamp {
            font-size: 14px;
            color: #666;
            margin-top: 5px;
        }
        .count {
            font-size: 18px;
            color: #333;
            margin: 10px 0;
        }
    </style>
</head>
<body>
"#;

/// Renders the self-contained snapshot document: generation date, total
/// count, and one card with a re-subscribe link per channel, in input order.
/// Pure: the same subscriptions and clock reading produce identical output.
pub fn render_html(subscriptions: &[Subscription], generated_on: DateTime<Local>) -> String {
    let mut html = String::with_capacity(DOCUMENT_HEAD.len() + subscriptions.len() * 256);
    html.push_str(DOCUMENT_HEAD);

    let _ = write!(
        html,
        "    <div class=\"header\">\n        <h1>YouTube Subscriptions</h1>\n        <div class=\"timestamp\">Generated on: {}</div>\n        <div class=\"count\">Total Subscriptions: {}</div>\n    </div>\n    <div class=\"subscription-list\">\n",
        generated_on.format("%B %d, %Y"),
        subscriptions.len(),
    );

    for subscription in subscriptions {
        let _ = write!(
            html,
            "        <div class=\"channel-card\">\n            <div class=\"channel-name\">{title}</div>\n            <a href=\"https://www.youtube.com/channel/{id}?sub_confirmation=1\"\n               class=\"subscribe-button\"\n               target=\"_blank\">\n                Subscribe\n            </a>\n        </div>\n",
            title = escape(&subscription.title),
            id = escape(&subscription.id),
        );
    }

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

/// `youtube-subscriptions-YYYY-MM-DD.html`.
pub fn snapshot_filename(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}-{date}.html")
}

/// Where snapshots land: `SUBSNAP_OUTPUT_DIR`, else the platform download
/// directory, else the working directory.
pub fn default_output_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SUBSNAP_OUTPUT_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Renders with the current wall clock and writes the snapshot into `dir`.
pub fn save_snapshot(subscriptions: &[Subscription], dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let html = render_html(subscriptions, now);
    let path = dir.join(snapshot_filename(now.date_naive()));

    std::fs::write(&path, html)
        .map_err(|e| SessionError::Render(format!("could not write {}: {e}", path.display())))?;

    info!("snapshot saved to {}", path.display());
    Ok(path)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
