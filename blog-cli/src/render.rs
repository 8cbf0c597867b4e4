use std::fmt::Write as _;

use blog_core::views::{ListingScope, ListingView, PostDetailView};
use blog_core::{CommentForest, Paginator, Post};
use chrono::{DateTime, Utc};

const INDENT: &str = "    ";

fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}

fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y %H:%M").to_string()
}

pub fn format_listing(view: &ListingView) -> String {
    let mut out = String::new();
    let heading = match view.scope() {
        ListingScope::All => "Blog Posts",
        ListingScope::Mine => "My Posts",
    };
    let _ = writeln!(out, "{heading} ({} total)", view.total());

    if view.posts().is_empty() {
        let _ = writeln!(out, "  no posts on this page");
    }
    for post in view.posts() {
        let _ = writeln!(out, "- [{}] {}", post.id, post.title);
        match (&view.scope(), &post.published_at) {
            (ListingScope::Mine, _) if !post.published => {
                let _ = writeln!(out, "  Draft, created {}", format_date(&post.created_at));
            }
            (_, Some(published_at)) => {
                let _ = writeln!(out, "  Published on {}", format_date(published_at));
            }
            _ => {}
        }
        if !post.summary.is_empty() {
            let _ = writeln!(out, "  {}", post.summary);
        }
    }

    out.push_str(&format_pager(&view.paginator()));
    out
}

pub fn format_pager(paginator: &Paginator) -> String {
    let pages: Vec<String> = paginator
        .window()
        .into_iter()
        .map(|page| {
            if page == paginator.current_page() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();

    let controls = paginator.controls();
    let mut enabled = Vec::new();
    if controls.first {
        enabled.push("first=1".to_string());
    }
    if controls.previous {
        enabled.push(format!("previous={}", paginator.current_page() - 1));
    }
    if controls.next {
        enabled.push(format!("next={}", paginator.current_page() + 1));
    }
    if controls.last {
        enabled.push(format!("last={}", paginator.total_pages()));
    }

    let mut out = format!(
        "Page {} of {}: {}\n",
        paginator.current_page(),
        paginator.total_pages(),
        pages.join(" ")
    );
    if !enabled.is_empty() {
        let _ = writeln!(out, "Navigate: {}", enabled.join(", "));
    }
    out
}

pub fn format_post(view: &PostDetailView) -> String {
    let Some(post) = view.post() else {
        return "Post not found\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "{}", "=".repeat(post.title.chars().count().max(1)));
    let _ = writeln!(out, "{}", publication_line(post));
    let _ = writeln!(out, "Created: {}", format_date(&post.created_at));
    if let Some(route) = view.edit_route() {
        let _ = writeln!(out, "You are the author ({})", route.path());
    }
    if !post.summary.is_empty() {
        let _ = writeln!(out, "\n{}", post.summary);
    }
    let _ = writeln!(out, "\n{}", post.content.trim_end());
    out
}

fn publication_line(post: &Post) -> String {
    match &post.published_at {
        Some(published_at) => format!("Published: {}", format_date(published_at)),
        None => "Published: Draft".to_string(),
    }
}

pub fn format_comments(forest: &CommentForest) -> String {
    let mut out = String::from("Comments\n");
    let order = forest.render_order();
    if order.is_empty() {
        out.push_str("  no comments yet\n");
        return out;
    }

    for (indent, comment) in order {
        let pad = INDENT.repeat(indent);
        let marker = if indent > 0 { "↳ " } else { "" };
        let _ = writeln!(out, "{pad}{marker}#{} {}", comment.id, comment.content.trim());
        let _ = writeln!(
            out,
            "{pad}{}  Posted on {}",
            " ".repeat(marker.chars().count()),
            format_datetime(&comment.created_at)
        );
    }
    if forest.orphan_count() > 0 {
        let _ = writeln!(
            out,
            "({} replies hidden: parent comment missing)",
            forest.orphan_count()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use blog_core::{Comment, Page, Session};
    use chrono::TimeZone;

    use super::*;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 2, 10, 30, 0)
            .single()
            .expect("valid ts")
    }

    fn post(id: i64, published: bool) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            content: "# Body".to_string(),
            summary: "Summary".to_string(),
            published,
            published_at: published.then(ts),
            created_at: ts(),
            updated_at: ts(),
            user_id: Some("p1".to_string()),
        }
    }

    fn comment(id: i64, parent_id: Option<i64>) -> Comment {
        Comment {
            id,
            content: format!("text {id}"),
            user_id: "p1".to_string(),
            post_id: 1,
            parent_id,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn pager_marks_current_page_and_enabled_controls() {
        let pager = format_pager(&Paginator::new(1, 10, 5));
        assert!(pager.starts_with("Page 1 of 10: [1] 2 3 4 5\n"));
        assert!(pager.contains("Navigate: next=2, last=10"));
        assert!(!pager.contains("previous"));
    }

    #[test]
    fn pager_for_single_page_has_no_navigation() {
        let pager = format_pager(&Paginator::new(1, 1, 5));
        assert_eq!(pager, "Page 1 of 1: [1]\n");
    }

    #[test]
    fn listing_shows_drafts_on_dashboard() {
        let session = Session::with_token("t");
        let mut view = ListingView::new(ListingScope::Mine, 10);
        let blog_core::views::ListingStep::Fetch(request) = view.reload(&session) else {
            panic!("expected fetch");
        };
        view.resolve(
            request.ticket,
            Ok(Page {
                items: vec![post(1, false), post(2, true)],
                total: 2,
                page: 1,
                page_size: 10,
                total_pages: 1,
            }),
        );

        let text = format_listing(&view);
        assert!(text.starts_with("My Posts (2 total)"));
        assert!(text.contains("Draft, created December 2, 2024"));
        assert!(text.contains("Published on December 2, 2024"));
    }

    #[test]
    fn comments_are_indented_by_capped_depth() {
        let forest = CommentForest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
            comment(5, Some(4)),
        ]);

        let text = format_comments(&forest);
        assert!(text.contains("\n#1 text 1\n"));
        assert!(text.contains(&format!("\n{}↳ #2 text 2\n", INDENT)));
        assert!(text.contains(&format!("\n{}↳ #4 text 4\n", INDENT.repeat(3))));
        assert!(text.contains(&format!("\n{}↳ #5 text 5\n", INDENT.repeat(3))));
    }

    #[test]
    fn hidden_replies_are_counted() {
        let forest = CommentForest::build(vec![comment(1, None), comment(2, Some(42))]);

        let text = format_comments(&forest);
        assert!(text.contains("#1 text 1"));
        assert!(!text.contains("#2 text 2"));
        assert!(text.ends_with("(1 replies hidden: parent comment missing)\n"));
    }

    #[test]
    fn empty_comments_have_placeholder() {
        let text = format_comments(&CommentForest::default());
        assert_eq!(text, "Comments\n  no comments yet\n");
    }

    #[test]
    fn post_shows_draft_state() {
        let mut view = PostDetailView::new(1);
        let ticket = view.load();
        view.resolve_post(ticket, Ok(post(1, false)), &Session::anonymous());

        let text = format_post(&view);
        assert!(text.starts_with("Post 1\n======\n"));
        assert!(text.contains("Published: Draft"));
        assert!(text.contains("# Body"));
        assert!(!text.contains("You are the author"));
    }
}
