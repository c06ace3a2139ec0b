mod auth;
mod config;
mod consultation;
mod db;
mod models;
mod notifications;
mod notify;
mod reports;
mod search;
mod ui;

use std::io;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::error;
use tracing_subscriber::EnvFilter;
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::auth::{AuthService, SessionContext};
use crate::consultation::ConsultationService;
use crate::models::ClientStatus;
use crate::notify::Notifier;
use crate::ui::{
    advisors::{AdvisorAction, AdvisorsState, handle_input as handle_advisors_input, render_advisors},
    appointment_wizard::{
        AppointmentWizardAction, AppointmentWizardState,
        handle_input as handle_appointment_wizard_input, render_appointment_wizard,
    },
    calendar::{CalendarAction, CalendarState, handle_input as handle_calendar_input, render_calendar},
    client_wizard::{
        ClientWizardAction, ClientWizardState, handle_input as handle_client_wizard_input,
        render_client_wizard,
    },
    clients::{ClientAction, ClientsState, handle_input as handle_clients_input, render_clients},
    consultations::{
        ConsultationAction, ConsultationsState, handle_input as handle_consultations_input,
        render_consultations,
    },
    home::{HomeAction, HomeState, HomeTab, handle_input as handle_home_input, render_home},
    intake::{IntakeAction, IntakeState, handle_input as handle_intake_input, render_intake},
    landing::{LandingAction, LandingState, handle_input as handle_landing_input, render_landing},
    login::{LoginAction, LoginMode, LoginState, handle_input as handle_login_input, render_login},
    reports::{ReportsAction, ReportsState, ReportSummary, handle_input as handle_reports_input, render_reports},
    search::{SearchAction, SearchState, handle_input as handle_search_input, render_search},
    task_wizard::{
        TaskWizardAction, TaskWizardState, handle_input as handle_task_wizard_input,
        render_task_wizard,
    },
    tasks::{TaskAction, TasksState, handle_input as handle_tasks_input, render_tasks},
};

#[derive(Parser)]
#[command(name = "advisor_crm", about = "Financial advisory CRM")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Launch the interactive CRM (the default)
    Run,
    /// Create or promote an admin account
    SeedAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
}

// Represents the current screen in the app
enum AppScreen {
    Landing,
    Login,
    Intake,
    Home,
    Clients,
    ClientWizard,
    Tasks,
    TaskWizard,
    Calendar,
    AppointmentWizard,
    Consultations,
    Advisors,
    Reports,
    Search,
}

// Main application state
struct App {
    db: db::Database,
    auth: AuthService,
    consultations: ConsultationService<db::Database>,
    ctx: SessionContext,
    screen: AppScreen,
    landing_state: Option<LandingState>,
    login_state: Option<LoginState>,
    intake_state: Option<IntakeState>,
    home_state: Option<HomeState>,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    tasks_state: Option<TasksState>,
    task_wizard_state: Option<TaskWizardState>,
    calendar_state: Option<CalendarState>,
    appointment_wizard_state: Option<AppointmentWizardState>,
    consultations_state: Option<ConsultationsState>,
    advisors_state: Option<AdvisorsState>,
    reports_state: Option<ReportsState>,
    search_state: Option<SearchState>,
}

impl App {
    fn new(db: db::Database, auth: AuthService, consultations: ConsultationService<db::Database>) -> Self {
        Self {
            db,
            auth,
            consultations,
            ctx: SessionContext::signed_out(),
            screen: AppScreen::Landing,
            landing_state: Some(LandingState::new()),
            login_state: None,
            intake_state: None,
            home_state: None,
            clients_state: None,
            client_wizard_state: None,
            tasks_state: None,
            task_wizard_state: None,
            calendar_state: None,
            appointment_wizard_state: None,
            consultations_state: None,
            advisors_state: None,
            reports_state: None,
            search_state: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::init()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Initialize database connection
    let db = db::init(&config).await?;

    let cli = Cli::parse();
    if let Some(Command::SeedAdmin {
        email,
        password,
        first_name,
        last_name,
    }) = cli.command
    {
        let auth = AuthService::new(db);
        auth.seed_admin(&email, &password, &first_name, &last_name)
            .await?;
        println!("Admin account ready for {email}");
        return Ok(());
    }

    let auth = AuthService::new(db.clone());
    let notifier = Notifier::from_config(&config);
    let consultations = ConsultationService::new(db.clone(), notifier);
    let mut app = App::new(db, auth, consultations);

    // Resolve any existing session before the first frame; bounded, and a
    // failure lands on the signed-out landing view.
    app.ctx = SessionContext::resolve(&app.auth, &app.db).await;
    if app.ctx.advisor_id().is_some() {
        load_home(&mut app).await;
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // Auth-change subscription; dropping the receiver at the end of this
    // function is the unsubscribe.
    let mut auth_changes = app.auth.subscribe();

    loop {
        // Re-resolve the role on every auth change.
        if auth_changes.has_changed().unwrap_or(false) {
            auth_changes.borrow_and_update();
            app.ctx = SessionContext::resolve(&app.auth, &app.db).await;
        }

        terminal.draw(|f| match app.screen {
            AppScreen::Landing => {
                if let Some(state) = &mut app.landing_state {
                    render_landing(f, state);
                }
            }
            AppScreen::Login => {
                if let Some(state) = &mut app.login_state {
                    render_login(f, state);
                }
            }
            AppScreen::Intake => {
                if let Some(state) = &mut app.intake_state {
                    render_intake(f, state);
                }
            }
            AppScreen::Home => {
                if let Some(state) = &mut app.home_state {
                    render_home(f, state);
                }
            }
            AppScreen::Clients => {
                if let Some(state) = &mut app.clients_state {
                    render_clients(f, state);
                }
            }
            AppScreen::ClientWizard => {
                if let Some(state) = &mut app.client_wizard_state {
                    render_client_wizard(f, state);
                }
            }
            AppScreen::Tasks => {
                if let Some(state) = &mut app.tasks_state {
                    render_tasks(f, state);
                }
            }
            AppScreen::TaskWizard => {
                if let Some(state) = &mut app.task_wizard_state {
                    render_task_wizard(f, state);
                }
            }
            AppScreen::Calendar => {
                if let Some(state) = &mut app.calendar_state {
                    render_calendar(f, state);
                }
            }
            AppScreen::AppointmentWizard => {
                if let Some(state) = &mut app.appointment_wizard_state {
                    render_appointment_wizard(f, state);
                }
            }
            AppScreen::Consultations => {
                if let Some(state) = &mut app.consultations_state {
                    render_consultations(f, state);
                }
            }
            AppScreen::Advisors => {
                if let Some(state) = &mut app.advisors_state {
                    render_advisors(f, state);
                }
            }
            AppScreen::Reports => {
                if let Some(state) = &mut app.reports_state {
                    render_reports(f, state);
                }
            }
            AppScreen::Search => {
                if let Some(state) = &mut app.search_state {
                    render_search(f, state);
                }
            }
        })?;

        let should_quit = match app.screen {
            AppScreen::Landing => handle_landing_screen(app)?,
            AppScreen::Login => handle_login_screen(app).await?,
            AppScreen::Intake => handle_intake_screen(app).await?,
            AppScreen::Home => handle_home_screen(app).await?,
            AppScreen::Clients => handle_clients_screen(app).await?,
            AppScreen::ClientWizard => handle_client_wizard_screen(app).await?,
            AppScreen::Tasks => handle_tasks_screen(app).await?,
            AppScreen::TaskWizard => handle_task_wizard_screen(app).await?,
            AppScreen::Calendar => handle_calendar_screen(app).await?,
            AppScreen::AppointmentWizard => handle_appointment_wizard_screen(app).await?,
            AppScreen::Consultations => handle_consultations_screen(app).await?,
            AppScreen::Advisors => handle_advisors_screen(app).await?,
            AppScreen::Reports => handle_reports_screen(app)?,
            AppScreen::Search => handle_search_screen(app)?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

fn show_landing(app: &mut App) {
    app.landing_state = Some(LandingState::new());
    app.screen = AppScreen::Landing;
}

/// Build the signed-in home screen. A failed notification load degrades to
/// an empty feed.
async fn load_home(app: &mut App) {
    let name = app
        .ctx
        .advisor
        .as_ref()
        .map(|a| {
            let full = a.full_name();
            if full.is_empty() { a.email.clone() } else { full }
        })
        .or_else(|| app.ctx.session.as_ref().map(|s| s.email.clone()))
        .unwrap_or_else(|| "Unknown".to_string());

    let notifications = match app.ctx.advisor_id() {
        Some(advisor_id) => {
            match notifications::load_notifications(&app.db, advisor_id, Utc::now()).await {
                Ok(feed) => feed,
                Err(err) => {
                    error!(error = %err, "failed to load notifications");
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    app.home_state = Some(HomeState::new(name, app.ctx.role, notifications));
    app.screen = AppScreen::Home;
}

fn handle_landing_screen(app: &mut App) -> Result<bool> {
    if let Some(state) = &mut app.landing_state {
        match handle_landing_input(state)? {
            Some(LandingAction::ShowLogin) => {
                app.login_state = Some(LoginState::new(LoginMode::Advisor));
                app.screen = AppScreen::Login;
            }
            Some(LandingAction::ShowAdminLogin) => {
                app.login_state = Some(LoginState::new(LoginMode::Admin));
                app.screen = AppScreen::Login;
            }
            Some(LandingAction::ShowIntake) => {
                app.intake_state = Some(IntakeState::new());
                app.screen = AppScreen::Intake;
            }
            Some(LandingAction::Exit) => return Ok(true),
            None => {}
        }
    }
    Ok(false)
}

async fn handle_login_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.login_state.as_mut() else {
        return Ok(false);
    };
    let mode = state.mode;

    match handle_login_input(state)? {
        Some(LoginAction::Back) => show_landing(app),
        Some(LoginAction::Submit { email, password }) => {
            let result = match mode {
                LoginMode::Advisor => app.auth.sign_in(&email, &password).await,
                LoginMode::Admin => app.auth.admin_sign_in(&email, &password).await,
            };

            match result {
                Ok(_) => {
                    app.ctx = SessionContext::resolve(&app.auth, &app.db).await;
                    if app.ctx.advisor_id().is_some() {
                        load_home(app).await;
                    } else {
                        // Authenticated but no resolvable role: lowest
                        // privilege view.
                        show_landing(app);
                    }
                }
                Err(err) => {
                    if let Some(state) = app.login_state.as_mut() {
                        state.error = Some(err.to_string());
                    }
                }
            }
        }
        None => {}
    }
    Ok(false)
}

async fn handle_intake_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.intake_state.as_mut() else {
        return Ok(false);
    };

    match handle_intake_input(state)? {
        Some(IntakeAction::Cancel) => show_landing(app),
        Some(IntakeAction::Submit(request)) => {
            match app.consultations.submit(request).await {
                Ok(_) => {
                    if let Some(state) = app.intake_state.as_mut() {
                        state.submitted = true;
                    }
                }
                Err(err) => {
                    error!(error = %err, "failed to submit consultation request");
                    if let Some(state) = app.intake_state.as_mut() {
                        state.error = Some(err.to_string());
                    }
                }
            }
        }
        None => {}
    }
    Ok(false)
}

async fn handle_home_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.home_state.as_mut() else {
        return Ok(false);
    };

    match handle_home_input(state)? {
        Some(HomeAction::Exit) => return Ok(true),
        Some(HomeAction::SignOut) => {
            app.auth.sign_out();
            app.ctx = SessionContext::signed_out();
            show_landing(app);
        }
        Some(HomeAction::Search(query)) => {
            if let Some(advisor_id) = app.ctx.advisor_id() {
                match search::search_all(&app.db, advisor_id, &query).await {
                    Ok(results) => {
                        app.search_state = Some(SearchState::new(query, results));
                        app.screen = AppScreen::Search;
                    }
                    Err(err) => error!(error = %err, "search failed"),
                }
            }
        }
        Some(HomeAction::Open(tab)) => match tab {
            HomeTab::Clients => load_clients(app).await,
            HomeTab::Calendar => load_calendar(app).await,
            HomeTab::Tasks => load_tasks(app).await,
            HomeTab::Reports => load_reports(app).await,
            HomeTab::Consultations => load_consultations(app).await,
            HomeTab::Advisors => load_advisors(app).await,
        },
        None => {}
    }
    Ok(false)
}

async fn load_clients(app: &mut App) {
    let Some(advisor_id) = app.ctx.advisor_id() else {
        return;
    };
    match app.db.get_clients_by_advisor(advisor_id).await {
        Ok(clients) => {
            app.clients_state = Some(ClientsState::new(advisor_id, clients));
            app.screen = AppScreen::Clients;
        }
        Err(err) => error!(error = %err, "failed to load clients"),
    }
}

async fn load_tasks(app: &mut App) {
    let Some(advisor_id) = app.ctx.advisor_id() else {
        return;
    };
    match app.db.get_tasks_by_advisor(advisor_id).await {
        Ok(tasks) => {
            app.tasks_state = Some(TasksState::new(advisor_id, tasks));
            app.screen = AppScreen::Tasks;
        }
        Err(err) => error!(error = %err, "failed to load tasks"),
    }
}

async fn load_calendar(app: &mut App) {
    let Some(advisor_id) = app.ctx.advisor_id() else {
        return;
    };
    match app.db.get_appointments_by_advisor(advisor_id).await {
        Ok(appointments) => {
            app.calendar_state = Some(CalendarState::new(advisor_id, appointments));
            app.screen = AppScreen::Calendar;
        }
        Err(err) => error!(error = %err, "failed to load appointments"),
    }
}

async fn load_consultations(app: &mut App) {
    match app.consultations.list_all().await {
        Ok(requests) => {
            app.consultations_state = Some(ConsultationsState::new(requests));
            app.screen = AppScreen::Consultations;
        }
        Err(err) => error!(error = %err, "failed to load consultation requests"),
    }
}

async fn load_advisors(app: &mut App) {
    match app.db.get_advisors().await {
        Ok(advisors) => {
            app.advisors_state = Some(AdvisorsState::new(advisors));
            app.screen = AppScreen::Advisors;
        }
        Err(err) => error!(error = %err, "failed to load advisors"),
    }
}

async fn load_reports(app: &mut App) {
    let Some(advisor_id) = app.ctx.advisor_id() else {
        return;
    };

    let filter = reports::ReportFilter::year_to_date(Utc::now().date_naive());

    let clients = match app.db.get_clients_by_advisor(advisor_id).await {
        Ok(clients) => clients,
        Err(err) => {
            error!(error = %err, "failed to load clients for reports");
            return;
        }
    };
    let tasks = match app.db.get_tasks_by_advisor(advisor_id).await {
        Ok(tasks) => tasks,
        Err(err) => {
            error!(error = %err, "failed to load tasks for reports");
            return;
        }
    };
    let appointments = match app.db.get_appointments_by_advisor(advisor_id).await {
        Ok(appointments) => appointments,
        Err(err) => {
            error!(error = %err, "failed to load appointments for reports");
            return;
        }
    };

    let data = reports::filter_data(&filter, &clients, &tasks, &appointments);
    let summary = ReportSummary {
        range_label: format!("{} to {}", filter.start, filter.end),
        client_count: data.clients.len(),
        active_clients: data
            .clients
            .iter()
            .filter(|c| c.status == ClientStatus::Active)
            .count(),
        appointment_count: data.appointments.len(),
        task_count: data.tasks.len(),
        total_aum: reports::total_aum(&data.clients),
        total_net_worth: reports::total_net_worth(&data.clients),
        client_statuses: reports::client_status_counts(&data.clients),
        task_statuses: reports::task_status_counts(&data.tasks),
        monthly_appointments: reports::monthly_appointments(&data.appointments),
        top_clients: reports::top_clients_by_aum(&data.clients),
    };

    app.reports_state = Some(ReportsState::new(summary));
    app.screen = AppScreen::Reports;
}

async fn handle_clients_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.clients_state.as_mut() else {
        return Ok(false);
    };
    let advisor_id = state.advisor_id();

    match handle_clients_input(state)? {
        Some(ClientAction::Back) => load_home(app).await,
        Some(ClientAction::NewClient) => {
            app.client_wizard_state = Some(ClientWizardState::new(advisor_id));
            app.screen = AppScreen::ClientWizard;
        }
        Some(ClientAction::EditClient(client_id)) => match app.db.get_client(client_id).await {
            Ok(client) => {
                app.client_wizard_state = Some(ClientWizardState::from_existing(client));
                app.screen = AppScreen::ClientWizard;
            }
            Err(err) => error!(error = %err, "failed to load client"),
        },
        Some(ClientAction::DeleteClient(client_id)) => {
            if let Err(err) = app.db.delete_client(client_id).await {
                error!(error = %err, "failed to delete client");
            }
            load_clients(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_client_wizard_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.client_wizard_state.as_mut() else {
        return Ok(false);
    };

    match handle_client_wizard_input(state)? {
        Some(ClientWizardAction::Cancel) => load_clients(app).await,
        Some(ClientWizardAction::Save(client)) => {
            let saved = if client.id == 0 {
                app.db.create_client(&client).await.map(|_| ())
            } else {
                app.db.update_client(&client).await
            };
            if let Err(err) = saved {
                error!(error = %err, "failed to save client");
            }
            load_clients(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_tasks_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.tasks_state.as_mut() else {
        return Ok(false);
    };
    let advisor_id = state.advisor_id();

    match handle_tasks_input(state)? {
        Some(TaskAction::Back) => load_home(app).await,
        Some(TaskAction::NewTask) => {
            app.task_wizard_state = Some(TaskWizardState::new(advisor_id));
            app.screen = AppScreen::TaskWizard;
        }
        Some(TaskAction::EditTask(task_id)) => match app.db.get_task(task_id).await {
            Ok(task) => {
                app.task_wizard_state = Some(TaskWizardState::from_existing(task));
                app.screen = AppScreen::TaskWizard;
            }
            Err(err) => error!(error = %err, "failed to load task"),
        },
        Some(TaskAction::SetStatus(task_id, status)) => {
            if let Err(err) = app.db.update_task_status(task_id, status).await {
                error!(error = %err, "failed to update task status");
            }
            load_tasks(app).await;
        }
        Some(TaskAction::DeleteTask(task_id)) => {
            if let Err(err) = app.db.delete_task(task_id).await {
                error!(error = %err, "failed to delete task");
            }
            load_tasks(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_task_wizard_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.task_wizard_state.as_mut() else {
        return Ok(false);
    };

    match handle_task_wizard_input(state)? {
        Some(TaskWizardAction::Cancel) => load_tasks(app).await,
        Some(TaskWizardAction::Save(task)) => {
            let saved = if task.id == 0 {
                app.db.create_task(&task).await.map(|_| ())
            } else {
                app.db.update_task(&task).await
            };
            if let Err(err) = saved {
                error!(error = %err, "failed to save task");
            }
            load_tasks(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_calendar_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.calendar_state.as_mut() else {
        return Ok(false);
    };
    let advisor_id = state.advisor_id();

    match handle_calendar_input(state)? {
        Some(CalendarAction::Back) => load_home(app).await,
        Some(CalendarAction::NewAppointment) => {
            app.appointment_wizard_state = Some(AppointmentWizardState::new(advisor_id));
            app.screen = AppScreen::AppointmentWizard;
        }
        Some(CalendarAction::EditAppointment(id)) => match app.db.get_appointment(id).await {
            Ok(appointment) => {
                app.appointment_wizard_state =
                    Some(AppointmentWizardState::from_existing(appointment));
                app.screen = AppScreen::AppointmentWizard;
            }
            Err(err) => error!(error = %err, "failed to load appointment"),
        },
        Some(CalendarAction::SetStatus(id, status)) => {
            if let Err(err) = app.db.update_appointment_status(id, status).await {
                error!(error = %err, "failed to update appointment status");
            }
            load_calendar(app).await;
        }
        Some(CalendarAction::DeleteAppointment(id)) => {
            if let Err(err) = app.db.delete_appointment(id).await {
                error!(error = %err, "failed to delete appointment");
            }
            load_calendar(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_appointment_wizard_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.appointment_wizard_state.as_mut() else {
        return Ok(false);
    };

    match handle_appointment_wizard_input(state)? {
        Some(AppointmentWizardAction::Cancel) => load_calendar(app).await,
        Some(AppointmentWizardAction::Save(appointment)) => {
            let saved = if appointment.id == 0 {
                app.db.create_appointment(&appointment).await.map(|_| ())
            } else {
                app.db.update_appointment(&appointment).await
            };
            if let Err(err) = saved {
                error!(error = %err, "failed to save appointment");
            }
            load_calendar(app).await;
        }
        None => {}
    }
    Ok(false)
}

async fn handle_consultations_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.consultations_state.as_mut() else {
        return Ok(false);
    };

    match handle_consultations_input(state)? {
        Some(ConsultationAction::Back) => load_home(app).await,
        Some(ConsultationAction::Review { id, decision, notes }) => {
            if let Err(err) = app
                .consultations
                .set_status(id, decision, notes.as_deref(), app.ctx.advisor_id())
                .await
            {
                error!(error = %err, "failed to update consultation request");
            }
            load_consultations(app).await;
        }
        Some(ConsultationAction::Promote(id)) => {
            if let Some(advisor_id) = app.ctx.advisor_id() {
                if let Err(err) = app
                    .consultations
                    .promote_to_appointment(id, advisor_id, None)
                    .await
                {
                    error!(error = %err, "failed to schedule appointment from request");
                }
                load_consultations(app).await;
            }
        }
        None => {}
    }
    Ok(false)
}

async fn handle_advisors_screen(app: &mut App) -> Result<bool> {
    let Some(state) = app.advisors_state.as_mut() else {
        return Ok(false);
    };

    match handle_advisors_input(state)? {
        Some(AdvisorAction::Back) => load_home(app).await,
        Some(AdvisorAction::Create(account)) => {
            if let Err(err) = app
                .auth
                .create_advisor_account(
                    &account.email,
                    &account.password,
                    &account.first_name,
                    &account.last_name,
                    account.role,
                )
                .await
            {
                error!(error = %err, "failed to create advisor account");
            }
            load_advisors(app).await;
        }
        Some(AdvisorAction::Rename {
            id,
            first_name,
            last_name,
        }) => {
            match app.db.get_advisor(id).await {
                Ok(mut advisor) => {
                    advisor.first_name = first_name;
                    advisor.last_name = last_name;
                    if let Err(err) = app.db.update_advisor(&advisor).await {
                        error!(error = %err, "failed to rename advisor");
                    }
                }
                Err(err) => error!(error = %err, "failed to load advisor"),
            }
            load_advisors(app).await;
        }
        Some(AdvisorAction::ToggleActive(id, is_active)) => {
            if let Err(err) = app.db.set_advisor_active(id, is_active).await {
                error!(error = %err, "failed to toggle advisor");
            }
            load_advisors(app).await;
        }
        Some(AdvisorAction::ToggleRole(id, role)) => {
            if let Err(err) = app.db.set_advisor_role(id, role).await {
                error!(error = %err, "failed to change advisor role");
            }
            load_advisors(app).await;
        }
        None => {}
    }
    Ok(false)
}

fn handle_reports_screen(app: &mut App) -> Result<bool> {
    if let Some(state) = app.reports_state.as_mut() {
        if let Some(ReportsAction::Back) = handle_reports_input(state)? {
            app.screen = AppScreen::Home;
        }
    }
    Ok(false)
}

fn handle_search_screen(app: &mut App) -> Result<bool> {
    if let Some(state) = app.search_state.as_mut() {
        if let Some(SearchAction::Back) = handle_search_input(state)? {
            app.screen = AppScreen::Home;
        }
    }
    Ok(false)
}
