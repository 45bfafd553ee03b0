use crate::gitlab::{Build, Comment, Event, MergeRequest, Push};

const BRANCH_PREFIX: &str = "refs/heads/";

/// Turns an event into the text posted to chat. `None` means the event is not worth a message.
pub fn render(event: &Event) -> Option<String> {
    match event {
        Event::Push(push) => render_push(push),
        Event::MergeRequest(mr) => render_merge_request(mr),
        Event::Comment(comment) => Some(render_comment(comment)),
        Event::Build(build) => render_build(build),
        Event::Unknown => None,
    }
}

fn branch_name(reference: &str) -> &str {
    reference.strip_prefix(BRANCH_PREFIX).unwrap_or(reference)
}

fn branch_link(project_url: &str, branch: &str) -> String {
    let escaped: String = url::form_urlencoded::byte_serialize(branch.as_bytes()).collect();
    format!("{}/-/tree/{}", project_url, escaped)
}

fn render_push(push: &Push) -> Option<String> {
    if push.total_commits <= 0 {
        return None;
    }

    let branch = branch_name(&push.reference);
    Some(format!(
        "🔨 New push by {} to {}.\nTarget branch: {}\n{}",
        push.actor,
        push.project_name,
        branch,
        branch_link(&push.project_url, branch),
    ))
}

fn render_merge_request(mr: &MergeRequest) -> Option<String> {
    let headline = match mr.action.as_str() {
        "approved" => "👍 This merge request get APPROVED by",
        "unapproved" => "👎 This merge request get UNAPPROVED by",
        "open" | "reopen" => "🔥 New merge request opened by",
        "close" => "❌ Merge request get closed by",
        "merge" => "🎉 Merge request get MERGED by",
        // updates, pipeline-triggered edits and the like
        _ => return None,
    };

    Some(format!("{} {}: {}\n{}", headline, mr.actor, mr.title, mr.url))
}

fn render_comment(comment: &Comment) -> String {
    format!("💬 New comment by {}.\n{}", comment.actor, comment.url)
}

fn render_build(build: &Build) -> Option<String> {
    let marker = match build.status.as_str() {
        "failed" => "❌",
        "success" => "✅",
        _ => return None,
    };

    let mut message = format!(
        "🚀 Job status for {} - {} : {} {}",
        build.project_name, build.build_name, build.status, marker,
    );
    if build.status == "failed" && !build.failure_reason.is_empty() {
        message.push_str("\nReason: ");
        message.push_str(&build.failure_reason);
    }
    message.push('\n');
    message.push_str(&build.url);

    Some(message)
}
