//! Server-rendered HTML views.
//!
//! Pages are plain HTML strings assembled here so route handlers stay thin.
//! Everything user-provided passes through [`escape`] before it reaches
//! markup.

use crate::common::pagination::PageItem;
use crate::domains::listings::models::{Listing, ListingKind, ModerationStatus};
use crate::domains::listings::moderation::ModerationStats;
use crate::domains::posts::models::Post;

/// Escape text for safe inclusion in HTML bodies and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page shell.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{} - MCP Directory</title>
<link rel="stylesheet" href="/static/site.css">
</head>
<body>
<header class="site-header">
  <a class="brand" href="/">MCP Directory</a>
  <nav>
    <a href="/servers">Servers</a>
    <a href="/clients">Clients</a>
    <a href="/blog">Blog</a>
    <a href="/submit">Submit</a>
  </nav>
</header>
<main>
{}
</main>
<footer class="site-footer">
  <p>A community directory of protocol servers and clients.</p>
</footer>
</body>
</html>"#,
        escape(title),
        body
    )
}

// ============================================================================
// Shared fragments
// ============================================================================

fn listing_card(listing: &Listing) -> String {
    let tags = listing
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", escape(t)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        r#"<article class="card">
  <h3><a href="{}">{}</a></h3>
  <p>{}</p>
  <div class="tags">{}</div>
</article>"#,
        listing.path(),
        escape(&listing.name),
        escape(&listing.description),
        tags
    )
}

/// Compressed page-number controls.
///
/// With one page or none the controls stay visible but disabled.
pub fn pagination_controls(
    items: &[PageItem],
    current: u32,
    total_pages: u32,
    base_path: &str,
) -> String {
    if total_pages <= 1 {
        return r#"<nav class="pagination disabled" aria-disabled="true">
  <span class="page current">1</span>
</nav>"#
            .to_string();
    }
    let mut out = String::from("<nav class=\"pagination\">\n");
    for item in items {
        match item {
            PageItem::Ellipsis => out.push_str("  <span class=\"ellipsis\">&hellip;</span>\n"),
            PageItem::Page(p) if *p == current => {
                out.push_str(&format!("  <span class=\"page current\">{}</span>\n", p));
            }
            PageItem::Page(p) => {
                out.push_str(&format!(
                    "  <a class=\"page\" href=\"{}?page={}\">{}</a>\n",
                    base_path, p, p
                ));
            }
        }
    }
    out.push_str("</nav>");
    out
}

fn detail_link_row(label: &str, url: &Option<String>) -> String {
    match url {
        Some(url) => format!(
            "<li>{}: <a href=\"{}\" rel=\"nofollow\">{}</a></li>",
            label,
            escape(url),
            escape(url)
        ),
        None => String::new(),
    }
}

fn string_list_section(heading: &str, values: &[String]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let items = values
        .iter()
        .map(|v| format!("<li>{}</li>", escape(v)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<section><h2>{}</h2><ul>{}</ul></section>", heading, items)
}

// ============================================================================
// Public pages
// ============================================================================

pub fn home_page(server_count: i64, client_count: i64, recent: &[Listing]) -> String {
    let cards = recent.iter().map(listing_card).collect::<Vec<_>>().join("\n");
    let body = format!(
        r#"<section class="hero">
  <h1>Discover protocol servers and clients</h1>
  <p><a href="/servers">{} servers</a> &middot; <a href="/clients">{} clients</a></p>
</section>
<section>
  <h2>Recently added</h2>
  <div class="grid">{}</div>
</section>"#,
        server_count, client_count, cards
    );
    layout("Home", &body)
}

pub fn browse_page(
    kind: ListingKind,
    listings: &[Listing],
    controls: &str,
    total_count: i64,
) -> String {
    let cards = listings
        .iter()
        .map(listing_card)
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!(
        r#"<h1>{}s</h1>
<p class="count">{} approved entries</p>
<div class="grid">{}</div>
{}"#,
        kind.label(),
        total_count,
        cards,
        controls
    );
    layout(&format!("{}s", kind.label()), &body)
}

pub fn listing_detail_page(listing: &Listing) -> String {
    let links = [
        detail_link_row("Website", &Some(listing.url.clone())),
        detail_link_row("GitHub", &listing.github_url),
        detail_link_row("Twitter", &listing.twitter_url),
    ]
    .join("\n");
    let contact = listing
        .contact_email
        .as_ref()
        .map(|e| format!("<p>Contact: {}</p>", escape(e)))
        .unwrap_or_default();
    let logo = listing
        .logo_url
        .as_ref()
        .map(|u| format!("<img class=\"logo\" src=\"{}\" alt=\"\">", escape(u)))
        .unwrap_or_default();
    let body = format!(
        r#"<article class="detail">
{}
<h1>{}</h1>
<p class="kind">{}</p>
<p>{}</p>
<ul class="links">
{}
</ul>
{}
{}
{}
{}
{}
</article>"#,
        logo,
        escape(&listing.name),
        listing.kind.label(),
        escape(&listing.description),
        links,
        contact,
        string_list_section("Tags", &listing.tags),
        string_list_section("Capabilities", &listing.capabilities),
        string_list_section("Features", &listing.features),
        string_list_section("Compatibility", &listing.compatibility),
    );
    layout(&listing.name, &body)
}

// ============================================================================
// Submission form
// ============================================================================

/// Previously-entered values plus field-level validation messages.
#[derive(Debug, Default)]
pub struct SubmitFormState {
    pub kind: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub tags: String,
    pub errors: Vec<(String, String)>,
}

impl SubmitFormState {
    fn error_for(&self, field: &str) -> String {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, msg)| format!("<p class=\"field-error\">{}</p>", escape(msg)))
            .unwrap_or_default()
    }
}

pub fn submit_form_page(state: &SubmitFormState) -> String {
    let body = format!(
        r#"<h1>Submit a listing</h1>
<p>Submissions are reviewed before they appear in the directory.</p>
<form method="post" action="/submit">
  <label>Type
    <select name="kind">
      <option value="server"{}>Server</option>
      <option value="client"{}>Client</option>
    </select>
  </label>
  <label>Name <input name="name" value="{}"></label>
  {}
  <label>Description <textarea name="description">{}</textarea></label>
  {}
  <label>URL <input name="url" value="{}"></label>
  {}
  <label>Tags (comma-separated) <input name="tags" value="{}"></label>
  <label>Logo URL <input name="logo_url"></label>
  <label>Contact email <input name="contact_email"></label>
  <label>GitHub URL <input name="github_url"></label>
  <label>Twitter URL <input name="twitter_url"></label>
  <label>Capabilities (comma-separated) <input name="capabilities"></label>
  <label>Features (comma-separated) <input name="features"></label>
  <label>Compatibility (comma-separated) <input name="compatibility"></label>
  <button type="submit">Submit for review</button>
</form>"#,
        if state.kind == "client" { "" } else { " selected" },
        if state.kind == "client" { " selected" } else { "" },
        escape(&state.name),
        state.error_for("name"),
        escape(&state.description),
        state.error_for("description"),
        escape(&state.url),
        state.error_for("url"),
        escape(&state.tags),
    );
    layout("Submit a listing", &body)
}

pub fn submit_thanks_page(listing: &Listing) -> String {
    let body = format!(
        r#"<h1>Thanks!</h1>
<p>{} was submitted and is awaiting review. It will appear in the directory once approved.</p>
<p><a href="/">Back to the directory</a></p>"#,
        escape(&listing.name)
    );
    layout("Submission received", &body)
}

// ============================================================================
// Blog
// ============================================================================

pub fn blog_index_page(posts: &[Post], controls: &str) -> String {
    let entries = posts
        .iter()
        .map(|post| {
            let excerpt = post
                .excerpt
                .as_ref()
                .map(|e| format!("<p>{}</p>", escape(e)))
                .unwrap_or_default();
            format!(
                r#"<article class="card">
  <h3><a href="/blog/{}">{}</a></h3>
  <time datetime="{}">{}</time>
  {}
</article>"#,
                escape(&post.slug),
                escape(&post.title),
                post.created_at.to_rfc3339(),
                post.created_at.format("%B %e, %Y"),
                excerpt
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!("<h1>Blog</h1>\n{}\n{}", entries, controls);
    layout("Blog", &body)
}

pub fn blog_post_page(post: &Post) -> String {
    let image = post
        .featured_image_url
        .as_ref()
        .map(|u| format!("<img class=\"featured\" src=\"{}\" alt=\"\">", escape(u)))
        .unwrap_or_default();
    // content_html is author-provided HTML composed by admins; it is
    // rendered as-is
    let body = format!(
        r#"<article class="post">
{}
<h1>{}</h1>
<time datetime="{}">{}</time>
<div class="content">{}</div>
</article>"#,
        image,
        escape(&post.title),
        post.created_at.to_rfc3339(),
        post.created_at.format("%B %e, %Y"),
        post.content_html,
    );
    layout(&post.title, &body)
}

// ============================================================================
// Admin
// ============================================================================

pub fn admin_dashboard_page(
    stats: &ModerationStats,
    bucket: ModerationStatus,
    kind: ListingKind,
    listings: &[Listing],
) -> String {
    let rows = listings
        .iter()
        .map(|l| admin_row(l, bucket))
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!(
        r#"<h1>Moderation</h1>
<ul class="stats">
  <li><a href="/admin?status=pending">Pending: {}</a></li>
  <li><a href="/admin?status=approved">Approved: {}</a></li>
  <li><a href="/admin?status=rejected">Rejected: {}</a></li>
</ul>
<p class="filters">
  <a href="/admin?status={}&amp;kind=server">Servers</a>
  <a href="/admin?status={}&amp;kind=client">Clients</a>
</p>
<h2>{} {}s</h2>
<table class="moderation">
<thead><tr><th>Name</th><th>Submitted</th><th>Actions</th></tr></thead>
<tbody>
{}
</tbody>
</table>
<p><a href="/admin/posts/new">Compose a blog post</a></p>"#,
        stats.pending(),
        stats.approved(),
        stats.rejected(),
        bucket,
        bucket,
        bucket,
        kind.label(),
        rows
    );
    layout("Moderation", &body)
}

fn admin_row(listing: &Listing, bucket: ModerationStatus) -> String {
    let actions = if bucket.can_moderate() {
        format!(
            r#"<form method="post" action="/admin/listings/{id}/approve"><button>Approve</button></form>
<form method="post" action="/admin/listings/{id}/reject"><button>Reject</button></form>"#,
            id = listing.id
        )
    } else {
        format!(
            r#"<form method="post" action="/admin/listings/{id}/delete"><button>Delete</button></form>"#,
            id = listing.id
        )
    };
    format!(
        "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
        listing.path(),
        escape(&listing.name),
        listing.created_at.format("%Y-%m-%d"),
        actions
    )
}

pub fn compose_form_page() -> String {
    let body = r#"<h1>Compose a post</h1>
<form method="post" action="/admin/posts">
  <label>Title <input name="title"></label>
  <label>Excerpt <input name="excerpt"></label>
  <label>Content (HTML) <textarea name="content_html" rows="20"></textarea></label>
  <label>Featured image URL <input name="featured_image_url"></label>
  <label>Tags (comma-separated) <input name="tags"></label>
  <label><input type="checkbox" name="publish" value="true"> Publish immediately</label>
  <button type="submit">Save</button>
</form>"#;
    layout("Compose a post", body)
}

// ============================================================================
// Auth and error pages
// ============================================================================

pub fn login_page(login_url: &str) -> String {
    let body = format!(
        r#"<h1>Sign in</h1>
<p>Sign-in is handled by our identity provider.</p>
<p><a class="button" href="{}">Continue to sign in</a></p>"#,
        escape(login_url)
    );
    layout("Sign in", &body)
}

pub fn not_found_page() -> String {
    let body = r#"<h1>Not found</h1>
<p>That page does not exist, or the listing it pointed at is no longer in the directory.</p>
<p><a href="/">Back to the directory</a></p>"#;
    layout("Not found", body)
}

pub fn access_denied_page() -> String {
    let body = r#"<h1>Access denied</h1>
<p>This area is restricted to directory admins.</p>
<p><a href="/">Back to the directory</a></p>"#;
    layout("Access denied", body)
}

pub fn load_failed_page() -> String {
    let body = r#"<div class="error-panel">
<h1>Failed to load</h1>
<p>Something went wrong talking to the backend. <a href="javascript:location.reload()">Try again</a></p>
</div>"#;
    layout("Failed to load", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::pagination::page_items;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_pagination_controls_disabled_but_present_for_single_page() {
        let html = pagination_controls(&page_items(1, 1), 1, 1, "/servers");
        assert!(html.contains("disabled"));
        assert!(html.contains("pagination"));
    }

    #[test]
    fn test_pagination_controls_link_other_pages() {
        let html = pagination_controls(&page_items(5, 20), 5, 20, "/servers");
        assert!(html.contains("href=\"/servers?page=4\""));
        assert!(html.contains("<span class=\"page current\">5</span>"));
        assert!(html.contains("&hellip;"));
        // Current page is not a link
        assert!(!html.contains("href=\"/servers?page=5\""));
    }
}
