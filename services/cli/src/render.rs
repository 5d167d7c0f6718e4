use monitoria::calls::Call;
use monitoria::dashboard::{BreakdownEntry, DashboardSummary, OperatorPerformanceRow, RecentActivity};
use monitoria::evaluations::{format_score, Criterion, Evaluation, ScoreBand};
use monitoria::query::Page;
use monitoria::users::User;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

fn page_footer<T>(page: &Page<T>, per_page: u32) {
    match page.window(per_page) {
        Some(window) => println!(
            "Showing {} to {} of {} | page {} of {}",
            window.first,
            window.last,
            window.total,
            page.current_page,
            page.total_pages.max(1)
        ),
        None => println!("No results"),
    }
    if page.has_next() {
        println!("Next page: --page {}", page.current_page + 1);
    }
}

pub(crate) fn render_user(user: &User) {
    println!("{} (@{})", user.display_name(), user.username);
    println!("- role: {}", user.role.label());
    if let Some(email) = &user.email {
        println!("- email: {email}");
    }
    if !user.is_active {
        println!("- account inactive");
    }
}

/// List rows carry no evaluations, so evaluation state is left to `calls show`.
fn call_row(call: &Call) -> String {
    format!(
        "- #{} {} | {} | {} | {} | {}",
        call.id.0,
        call.protocol,
        call.customer_name,
        call.status.label(),
        call.priority.label(),
        call.operator_display_name().unwrap_or("unassigned")
    )
}

pub(crate) fn render_call_page(page: &Page<Call>, per_page: u32) {
    println!("Calls");
    for call in &page.items {
        println!("{}", call_row(call));
    }
    page_footer(page, per_page);
}

pub(crate) fn render_call_detail(call: &Call) {
    println!("Call #{} ({})", call.id.0, call.protocol);
    println!("- subject: {}", call.subject);
    println!("- customer: {}", call.customer_name);
    if let Some(phone) = &call.customer_phone {
        println!("- phone: {phone}");
    }
    if let Some(email) = &call.customer_email {
        println!("- email: {email}");
    }
    println!(
        "- status: {} | priority: {} | category: {}",
        call.status.label(),
        call.priority.label(),
        call.category
            .as_ref()
            .map(|category| category.label())
            .unwrap_or("none")
    );
    println!(
        "- operator: {}",
        call.operator_display_name().unwrap_or("unassigned")
    );
    if let Some(minutes) = call.duration_in_minutes() {
        println!("- duration: {minutes} min");
    }
    println!("- opened: {}", call.created_at.format(TIMESTAMP_FORMAT));
    for (label, text) in [
        ("description", &call.description),
        ("resolution", &call.resolution),
        ("notes", &call.notes),
    ] {
        if let Some(text) = text.as_deref().filter(|text| !text.trim().is_empty()) {
            println!("- {label}: {text}");
        }
    }

    for evaluation in &call.evaluations {
        println!();
        render_evaluation(evaluation);
    }
}

pub(crate) fn render_evaluation(evaluation: &Evaluation) {
    let band = ScoreBand::for_score(evaluation.overall_score);
    println!(
        "Evaluation #{} for call #{}: {} ({})",
        evaluation.id.0,
        evaluation.call_id.0,
        format_score(evaluation.overall_score),
        band.label()
    );
    if let Some(evaluator) = &evaluation.evaluator_name {
        println!("- evaluator: {evaluator}");
    }
    for criterion in Criterion::ALL {
        println!(
            "  - {}: {}",
            criterion.label(),
            evaluation.scores.get(criterion)
        );
    }
    println!("- positive points: {}", evaluation.positive_points);
    println!("- points to improve: {}", evaluation.improvement_points);
    if let Some(comments) = evaluation
        .general_comments
        .as_deref()
        .filter(|comments| !comments.trim().is_empty())
    {
        println!("- comments: {comments}");
    }
    if evaluation.requires_coaching {
        println!("- flagged for coaching");
    }
    if evaluation.is_exemplary {
        println!("- marked exemplary");
    }
}

pub(crate) fn render_evaluation_page(page: &Page<Evaluation>, per_page: u32) {
    println!("Evaluations");
    for evaluation in &page.items {
        let mut flags = Vec::new();
        if evaluation.requires_coaching {
            flags.push("coaching");
        }
        if evaluation.is_exemplary {
            flags.push("exemplary");
        }
        println!(
            "- #{} call #{} | {} | {}{}",
            evaluation.id.0,
            evaluation.call_id.0,
            format_score(evaluation.overall_score),
            evaluation.evaluator_name.as_deref().unwrap_or("unknown evaluator"),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" | {}", flags.join(", "))
            }
        );
    }
    page_footer(page, per_page);
}

fn render_breakdown(title: &str, entries: &[BreakdownEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{title}:");
    for entry in entries {
        println!("  - {}: {}", entry.label, entry.value);
    }
}

pub(crate) fn render_dashboard(summary: &DashboardSummary) {
    match summary.period_days {
        Some(days) => println!("Dashboard (last {days} days)"),
        None => println!("Dashboard"),
    }
    println!(
        "- {} calls | {} min average duration",
        summary.total_calls, summary.avg_duration_minutes
    );
    println!(
        "- {} evaluations | {} average score",
        summary.total_evaluations, summary.avg_overall_score_label
    );
    if let Some(coaching) = summary.coaching_needed {
        println!("- {coaching} flagged for coaching");
    }
    if let Some(exemplary) = summary.exemplary {
        println!("- {exemplary} exemplary");
    }
    render_breakdown("Calls by status", &summary.status_breakdown);
    render_breakdown("Calls by priority", &summary.priority_breakdown);
    render_breakdown("Calls by category", &summary.category_breakdown);
}

pub(crate) fn render_recent_activity(recent: &RecentActivity) {
    println!("\nRecent calls");
    for call in &recent.recent_calls {
        println!(
            "- #{} {} | {} | {}",
            call.id.0,
            call.protocol,
            call.status.label(),
            call.created_at.format(TIMESTAMP_FORMAT)
        );
    }
    println!("Recent evaluations");
    for evaluation in &recent.recent_evaluations {
        println!(
            "- #{} call #{} | {}",
            evaluation.id.0,
            evaluation.call_id.0,
            format_score(evaluation.overall_score)
        );
    }
}

pub(crate) fn render_operator_performance(rows: &[OperatorPerformanceRow]) {
    println!("\nOperator performance");
    for row in rows {
        println!(
            "- {} | {} calls | {} min avg | {} ({})",
            row.operator_name,
            row.total_calls,
            row.avg_duration_minutes,
            row.avg_score_label,
            row.band.label()
        );
    }
}
