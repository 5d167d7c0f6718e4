use std::io::{self, BufRead, Write};

use monitoria::calls::CallId;
use monitoria::error::AppError;
use monitoria::evaluations::{Criterion, EvaluationId};
use monitoria::query::{CallFilter, EvaluationFilter, ListQuery};
use monitoria::session::{
    AuthoringError, CallDetailView, CallListView, DashboardView, EvaluationAuthoring,
    EvaluationListView, ViewError, ViewState,
};
use serde::Serialize;

use crate::cli::{
    CallListArgs, CallShowArgs, CreateEvaluationArgs, DashboardArgs, DeleteEvaluationArgs,
    EditEvaluationArgs, EvaluationFormArgs, EvaluationListArgs, LoginArgs,
};
use crate::context::Context;
use crate::render;

fn ready<'a, T>(state: &'a ViewState<T>) -> Result<&'a T, AppError> {
    match state {
        ViewState::Ready(value) => Ok(value),
        ViewState::Failed(err) => Err(view_failure(err)),
        ViewState::Idle | ViewState::Loading => {
            Err(AppError::Usage("view did not finish loading".to_string()))
        }
    }
}

fn view_failure(err: &ViewError) -> AppError {
    match err {
        ViewError::LoginRequired => AppError::Usage(
            "session expired; run `monitoria login --username <name>`".to_string(),
        ),
        other => AppError::Usage(other.message()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Usage(format!("could not encode output: {err}")))?;
    println!("{raw}");
    Ok(())
}

fn authoring_failure(err: AuthoringError) -> AppError {
    match err {
        AuthoringError::Invalid(report) => {
            let mut message = format!("evaluation not saved; {} field(s) need attention", report.len());
            for (field, text) in report.messages() {
                message.push_str(&format!("\n  - {}: {}", field.key(), text));
            }
            AppError::Usage(message)
        }
        AuthoringError::Submit(api) => AppError::Api(api),
        other => AppError::Usage(other.to_string()),
    }
}

fn apply_form(authoring: &mut EvaluationAuthoring, form: EvaluationFormArgs) -> Result<(), AuthoringError> {
    if let Some(scores) = form.scores {
        for (criterion, score) in Criterion::ALL.into_iter().zip(scores) {
            authoring.set_score(criterion, score)?;
        }
    }
    if let Some(text) = form.positive {
        authoring.set_positive_points(text)?;
    }
    if let Some(text) = form.improvement {
        authoring.set_improvement_points(text)?;
    }
    if let Some(text) = form.comments {
        authoring.set_general_comments(text)?;
    }
    if let Some(flag) = form.requires_coaching {
        authoring.set_requires_coaching(flag)?;
    }
    if let Some(flag) = form.exemplary {
        authoring.set_is_exemplary(flag)?;
    }
    Ok(())
}

pub(crate) async fn login(context: &Context, args: LoginArgs) -> Result<(), AppError> {
    let password = match args.password {
        Some(password) => password,
        None => {
            print!("password: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let user = context.client.login(&args.username, &password).await?;
    if context.json {
        return print_json(&user);
    }
    println!("Signed in as {} ({})", user.display_name(), user.role.label());
    Ok(())
}

pub(crate) async fn logout(context: &Context) -> Result<(), AppError> {
    context.client.logout().await?;
    println!("Signed out");
    Ok(())
}

pub(crate) async fn whoami(context: &Context) -> Result<(), AppError> {
    let user = context.client.current_user().await?;
    if context.json {
        return print_json(&user);
    }
    render::render_user(&user);
    Ok(())
}

pub(crate) async fn list_calls(context: &Context, args: CallListArgs) -> Result<(), AppError> {
    let mut query = ListQuery::calls();
    let filters = [
        (CallFilter::Status, args.status),
        (CallFilter::Priority, args.priority),
        (CallFilter::Category, args.category),
        (CallFilter::OperatorId, args.operator_id.map(|id| id.to_string())),
        (CallFilter::DateFrom, args.date_from),
        (CallFilter::DateTo, args.date_to),
    ];
    for (filter, value) in filters {
        if let Some(value) = value {
            query.set_filter(filter.key(), value);
        }
    }
    query.set_page(args.page);
    let mut view = CallListView::with_query(query);

    view.load(&context.client).await;
    let page = ready(view.state())?;
    if context.json {
        return print_json(page);
    }
    render::render_call_page(page, view.query().per_page());
    Ok(())
}

pub(crate) async fn show_call(context: &Context, args: CallShowArgs) -> Result<(), AppError> {
    let user = context.user().await?;
    let mut view = CallDetailView::new(CallId(args.call_id));
    view.load(&context.client).await;

    if view.offers_back_to_calls() {
        println!("Call {} was not found. Back to calls: `monitoria calls list`", args.call_id);
        return Ok(());
    }
    let call = ready(view.state())?;
    if context.json {
        return print_json(call);
    }
    render::render_call_detail(call);
    if view.can_offer_new_evaluation(&user) {
        println!(
            "\nNo evaluation yet. Evaluate with `monitoria evaluations create {}`",
            args.call_id
        );
    }
    Ok(())
}

pub(crate) async fn list_evaluations(
    context: &Context,
    args: EvaluationListArgs,
) -> Result<(), AppError> {
    let mut query = ListQuery::evaluations();
    let filters = [
        (EvaluationFilter::Search, args.search),
        (
            EvaluationFilter::RequiresCoaching,
            args.requires_coaching.map(|flag| flag.to_string()),
        ),
        (
            EvaluationFilter::IsExemplary,
            args.is_exemplary.map(|flag| flag.to_string()),
        ),
        (EvaluationFilter::CallId, args.call_id.map(|id| id.to_string())),
        (
            EvaluationFilter::OperatorId,
            args.operator_id.map(|id| id.to_string()),
        ),
    ];
    for (filter, value) in filters {
        if let Some(value) = value {
            query.set_filter(filter.key(), value);
        }
    }
    query.set_page(args.page);
    let mut view = EvaluationListView::with_query(query);

    view.load(&context.client).await;
    let page = ready(view.state())?;
    if context.json {
        return print_json(page);
    }
    render::render_evaluation_page(page, view.query().per_page());
    Ok(())
}

pub(crate) async fn create_evaluation(
    context: &Context,
    args: CreateEvaluationArgs,
) -> Result<(), AppError> {
    let user = context.user().await?;
    let mut view = CallDetailView::new(CallId(args.call_id));
    view.load(&context.client).await;
    ready(view.state())?;

    view.begin_new_evaluation(&user).map_err(authoring_failure)?;
    apply_form(view.authoring_mut(), args.form).map_err(authoring_failure)?;
    let saved = view
        .submit_evaluation(&context.client)
        .await
        .map_err(authoring_failure)?;

    if context.json {
        return print_json(&saved);
    }
    println!("Evaluation {} saved for call {}", saved.id.0, args.call_id);
    if let Some(call) = view.call() {
        render::render_call_detail(call);
    }
    Ok(())
}

pub(crate) async fn edit_evaluation(
    context: &Context,
    args: EditEvaluationArgs,
) -> Result<(), AppError> {
    let user = context.user().await?;
    let evaluation_id = EvaluationId(args.evaluation_id);
    let stored = context.client.get_evaluation(evaluation_id).await?;

    let mut view = CallDetailView::new(stored.call_id);
    view.load(&context.client).await;
    ready(view.state())?;

    view.begin_edit_evaluation(&user, evaluation_id)
        .map_err(authoring_failure)?;
    apply_form(view.authoring_mut(), args.form).map_err(authoring_failure)?;
    let saved = view
        .submit_evaluation(&context.client)
        .await
        .map_err(authoring_failure)?;

    if context.json {
        return print_json(&saved);
    }
    println!("Evaluation {} updated", saved.id.0);
    render::render_evaluation(&saved);
    Ok(())
}

pub(crate) async fn delete_evaluation(
    context: &Context,
    args: DeleteEvaluationArgs,
) -> Result<(), AppError> {
    let user = context.user().await?;
    let mut view = EvaluationListView::new();
    view.delete(&context.client, &user, EvaluationId(args.evaluation_id))
        .await
        .map_err(|err| view_failure(&err))?;
    println!("Evaluation {} deleted", args.evaluation_id);
    Ok(())
}

pub(crate) async fn dashboard(context: &Context, args: DashboardArgs) -> Result<(), AppError> {
    let user = context.user().await?;
    let mut view = DashboardView::new(args.days, args.recent);
    view.load(&context.client, &user).await;

    let summary = ready(view.stats())?;
    if context.json {
        return print_json(summary);
    }
    render::render_dashboard(summary);
    match view.recent() {
        ViewState::Ready(recent) => render::render_recent_activity(recent),
        ViewState::Failed(err) => println!("\nRecent activity unavailable: {}", err.message()),
        ViewState::Idle | ViewState::Loading => {}
    }
    match view.performance() {
        ViewState::Ready(rows) => render::render_operator_performance(rows),
        ViewState::Failed(err) => println!("\nOperator performance unavailable: {}", err.message()),
        ViewState::Idle | ViewState::Loading => {}
    }
    Ok(())
}
