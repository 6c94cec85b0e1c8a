use clap::{Parser, Subcommand};
use frostgate::auth::{Navigation, View};
use frostgate::error::app_error::ClientError;
use frostgate::models::batch::CreateBatchRequest;
use frostgate::models::product::CreateProductRequest;
use frostgate::models::sensor::CreateSensorRequest;
use frostgate::models::user::Credentials;
use frostgate::models::warehouse::CreateWarehouseRequest;
use frostgate::page::{LoadOutcome, Page};
use frostgate::pages::alerts::AlertsPage;
use frostgate::pages::batches::AddBatchPage;
use frostgate::pages::home::HomePage;
use frostgate::pages::products::ProductsPage;
use frostgate::pages::report::ReportPage;
use frostgate::pages::sensors::SensorsPage;
use frostgate::pages::utility::UtilityPage;
use frostgate::pages::warehouse::WarehousePage;
use frostgate::service::auth::AuthService;
use frostgate::{Config, Console, build_console, init_tracing};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "frostgate", version, about = "Console for the cold-chain warehouse backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session for 24 hours instead of one
        #[arg(long)]
        remember: bool,
    },
    /// Create an account and log in
    Signup {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember: bool,
    },
    /// Print the URL that starts the OAuth flow
    OauthUrl,
    /// Store the session from the URL the OAuth flow redirected to
    OauthCallback {
        url: String,
        #[arg(long)]
        remember: bool,
    },
    Logout,
    /// Show who is logged in and for how long
    Whoami,
    /// List warehouses and the open alert count
    Warehouses,
    /// Select the warehouse the other commands act on
    Select { warehouse_id: String },
    /// Show the selected warehouse and its batches
    Warehouse,
    CreateWarehouse {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        capacity: i64,
    },
    Batches {
        #[command(subcommand)]
        action: BatchCommand,
    },
    Products {
        #[command(subcommand)]
        action: ProductCommand,
    },
    Sensors {
        #[command(subcommand)]
        action: SensorCommand,
    },
    Alerts {
        #[arg(long)]
        resolve_all: bool,
    },
    /// Utilization of every warehouse, computed from their batches
    Utilization {
        #[arg(long)]
        json: bool,
    },
    /// Utilization totals as reported by the backend
    Utility {
        #[arg(long)]
        json: bool,
    },
    Report,
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum BatchCommand {
    /// Products and free sensors for a new batch
    Options,
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        sensor: String,
        #[arg(long)]
        quantity: i64,
    },
    /// Remove a batch from the selected warehouse
    Dispatch { batch_id: String },
}

#[derive(Subcommand)]
enum ProductCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, allow_hyphen_values = true)]
        min_temp: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max_temp: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        min_humidity: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max_humidity: Option<f64>,
    },
    Delete { product_id: String },
}

#[derive(Subcommand)]
enum SensorCommand {
    List,
    Create {
        #[arg(long)]
        ip: String,
        #[arg(long = "type")]
        sensor_type: String,
        #[arg(long)]
        device_id: Option<String>,
    },
}

impl Command {
    /// The dashboard view a command stands in for. `None` for commands that
    /// work without a session.
    fn view(&self) -> Option<View> {
        match self {
            Command::Login { .. }
            | Command::Signup { .. }
            | Command::OauthUrl
            | Command::OauthCallback { .. }
            | Command::Logout
            | Command::Config => None,
            Command::Whoami | Command::Warehouses | Command::Select { .. } => Some(View::Home),
            Command::Warehouse => Some(View::Warehouse),
            Command::CreateWarehouse { .. } => Some(View::CreateWarehouse),
            Command::Batches {
                action: BatchCommand::Dispatch { .. },
            } => Some(View::Warehouse),
            Command::Batches { .. } => Some(View::AddBatch),
            Command::Products { .. } => Some(View::CreateProduct),
            Command::Sensors { .. } => Some(View::CreateSensor),
            Command::Alerts { .. } => Some(View::Alerts),
            Command::Utilization { .. } | Command::Utility { .. } => Some(View::Utility),
            Command::Report => Some(View::Report),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{0}")]
    Page(String),
    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    fn requires_login(&self) -> bool {
        matches!(self, CliError::Client(e) if e.requires_login())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.level, config.logging.json_format);

    let mut console = match build_console(config) {
        Ok(console) => console,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut console, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.requires_login() => {
            if let CliError::Client(error) = &e {
                console.guard.on_error(error);
            }
            eprintln!("Session expired. Run `frostgate login <email> --password <password>` to sign in again.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(console: &mut Console, command: Command) -> Result<(), CliError> {
    if let Some(view) = command.view()
        && let Navigation::Redirect(_) = console.guard.enter(view)
    {
        return Err(ClientError::SessionExpired.into());
    }

    let gateway = &console.gateway;
    let context = &console.context;

    match command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let session = AuthService::new(gateway, &console.config)
                .login(&Credentials { email, password }, remember)
                .await?;
            println!("Logged in as {}.", session.user_identifier);
        }
        Command::Signup {
            email,
            password,
            remember,
        } => {
            let session = AuthService::new(gateway, &console.config)
                .signup(&Credentials { email, password }, remember)
                .await?;
            println!("Account created for {}.", session.user_identifier);
        }
        Command::OauthUrl => {
            println!("{}", AuthService::new(gateway, &console.config).oauth_url()?);
        }
        Command::OauthCallback { url, remember } => {
            match AuthService::new(gateway, &console.config).capture_oauth_redirect(&url, remember)? {
                Some(session) => println!("Logged in as {}.", session.user_identifier),
                None => return Err(CliError::Page("No token in the callback URL.".to_string())),
            }
        }
        Command::Logout => {
            AuthService::new(gateway, &console.config).logout().await?;
            println!("Logged out.");
        }
        Command::Whoami => {
            let sessions = gateway.sessions();
            if let Some(session) = sessions.valid_session() {
                let minutes = session.remaining_ms(sessions.now_epoch_ms()) / 60_000;
                println!("{} ({} min left)", session.user_identifier, minutes);
            }
            if let Some(warehouse) = context.get_current_warehouse() {
                println!("Selected warehouse: {}", warehouse.display_name());
            }
        }
        Command::Warehouses => {
            let mut home = HomePage::new();
            let outcome = home.load(gateway).await;
            let overview = shown(home.page(), outcome)?;
            println!("{} open alert(s)", overview.alerts_count);
            for warehouse in &overview.warehouses {
                println!(
                    "{:<12} {:<24} {:<16} cap {}",
                    warehouse.id.as_deref().unwrap_or("-"),
                    warehouse.display_name(),
                    warehouse.location,
                    warehouse.storage_capacity
                );
            }
        }
        Command::Select { warehouse_id } => {
            let mut home = HomePage::new();
            let outcome = home.load(gateway).await;
            shown(home.page(), outcome)?;
            let warehouse = home.select(context, &warehouse_id)?;
            println!("Selected {}.", warehouse.display_name());
        }
        Command::Warehouse => {
            let mut page = WarehousePage::new();
            let outcome = page.load(gateway, context).await;
            let detail = shown(page.page(), outcome)?;
            if let Some(warehouse) = &detail.warehouse {
                println!("{} ({})", warehouse.display_name(), warehouse.location);
            }
            println!("Load {} / utilization {:.1}%", detail.current_load(), detail.display_utilization());
            for batch in &detail.batches {
                println!(
                    "{:<12} qty {:<8} sensor {}",
                    batch.id.as_deref().unwrap_or("-"),
                    batch.quantity,
                    batch.sensor_id.as_deref().unwrap_or("-")
                );
            }
        }
        Command::CreateWarehouse {
            name,
            location,
            capacity,
        } => {
            let request = CreateWarehouseRequest { name, location, capacity };
            let mut home = HomePage::new();
            home.create_warehouse(gateway, &request).await?;
            println!("Warehouse created.");
        }
        Command::Batches { action } => run_batches(console, action).await?,
        Command::Products { action } => run_products(console, action).await?,
        Command::Sensors { action } => run_sensors(console, action).await?,
        Command::Alerts { resolve_all } => {
            let mut page = AlertsPage::new();
            let outcome = page.load(gateway).await;
            shown(page.page(), outcome)?;
            if resolve_all {
                let moved = page.resolve_all(gateway).await?;
                println!("Resolved {} alert(s).", moved);
            }
            if let Some(board) = page.page().data() {
                for (label, alerts) in [("OPEN", &board.unresolved), ("RESOLVED", &board.resolved)] {
                    for alert in alerts {
                        println!(
                            "{:<9} {:<20} {:<16} {}",
                            label,
                            alert.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
                            alert.alert_type,
                            alert.message.as_deref().unwrap_or_default()
                        );
                    }
                }
            }
        }
        Command::Utilization { json } => {
            let mut page = UtilityPage::new();
            let outcome = page.load_breakdown(gateway).await;
            let report = shown(page.breakdown(), outcome)?;
            if json {
                println!("{}", serde_json::to_string_pretty(report).map_err(|e| CliError::Render(e.to_string()))?);
            } else {
                for row in &report.warehouses {
                    println!(
                        "{:<24} {:>8} / {:<8} {:>6.1}% {:?}",
                        row.name,
                        row.current_occupancy,
                        row.normalized_capacity,
                        row.utilization_percent,
                        row.band()
                    );
                }
                println!(
                    "Total {} / {} ({:.1}%)",
                    report.total_occupied, report.total_capacity, report.global_utilization
                );
            }
        }
        Command::Utility { json } => {
            let mut page = UtilityPage::new();
            let outcome = page.load_summary(gateway).await;
            let summary = shown(page.summary(), outcome)?;
            if json {
                println!("{}", serde_json::to_string_pretty(summary).map_err(|e| CliError::Render(e.to_string()))?);
            } else {
                println!("{} ({:.1}%, {:?})", summary.used_text, summary.utilization_percent, summary.band());
            }
        }
        Command::Report => {
            let mut page = ReportPage::new();
            let outcome = page.generate(gateway).await;
            let report = shown(page.page(), outcome)?;
            if report.is_empty() {
                println!("The backend returned an empty report.");
            } else {
                println!("{}", report.report);
            }
        }
        Command::Config => {
            println!("{}", console.config.to_toml().map_err(|e| CliError::Render(e.to_string()))?);
        }
    }

    Ok(())
}

async fn run_batches(console: &Console, action: BatchCommand) -> Result<(), CliError> {
    let (gateway, context) = (&console.gateway, &console.context);
    match action {
        BatchCommand::Options => {
            let mut page = AddBatchPage::new();
            let outcome = page.load(gateway, context).await;
            let options = shown(page.page(), outcome)?;
            for product in &options.products {
                println!("product {:<12} {}", product.id.as_deref().unwrap_or("-"), product.name);
            }
            for sensor in options.available_sensors() {
                println!("sensor  {:<12} {}", sensor.id.as_deref().unwrap_or("-"), sensor.label());
            }
        }
        BatchCommand::Add {
            product,
            sensor,
            quantity,
        } => {
            let request = CreateBatchRequest {
                product_id: product,
                sensor_id: sensor,
                quantity,
            };
            AddBatchPage::new().submit(gateway, context, &request).await?;
            println!("Batch created.");
        }
        BatchCommand::Dispatch { batch_id } => {
            WarehousePage::new().dispatch_batch(gateway, &batch_id).await?;
            println!("Batch {} dispatched.", batch_id);
        }
    }
    Ok(())
}

async fn run_products(console: &Console, action: ProductCommand) -> Result<(), CliError> {
    let gateway = &console.gateway;
    let mut page = ProductsPage::new();
    match action {
        ProductCommand::List => {
            let outcome = page.load(gateway).await;
            for product in shown(page.page(), outcome)? {
                println!(
                    "{:<12} {:<24} {}..{} C, {}..{} %RH",
                    product.id.as_deref().unwrap_or("-"),
                    product.name,
                    display_bound(product.min_temp),
                    display_bound(product.max_temp),
                    display_bound(product.min_humi),
                    display_bound(product.max_humi)
                );
            }
        }
        ProductCommand::Create {
            name,
            description,
            min_temp,
            max_temp,
            min_humidity,
            max_humidity,
        } => {
            let request = CreateProductRequest {
                name,
                description,
                min_temp,
                max_temp,
                min_humi: min_humidity,
                max_humi: max_humidity,
            };
            page.create(gateway, &request).await?;
            println!("Product created.");
        }
        ProductCommand::Delete { product_id } => {
            page.delete(gateway, &product_id).await?;
            println!("Product {} deleted.", product_id);
        }
    }
    Ok(())
}

async fn run_sensors(console: &Console, action: SensorCommand) -> Result<(), CliError> {
    let (gateway, context) = (&console.gateway, &console.context);
    let mut page = SensorsPage::new();
    match action {
        SensorCommand::List => {
            let outcome = page.load(gateway, context).await;
            for sensor in shown(page.page(), outcome)? {
                println!(
                    "{:<12} {:<16} {:<30} {}",
                    sensor.id.as_deref().unwrap_or("-"),
                    sensor.ip_address,
                    sensor.label(),
                    sensor.status.as_deref().unwrap_or("available")
                );
            }
        }
        SensorCommand::Create {
            ip,
            sensor_type,
            device_id,
        } => {
            let request = CreateSensorRequest {
                ip_address: ip,
                sensor_type,
                device_id,
            };
            page.create(gateway, context, &request).await?;
            println!("Sensor registered.");
        }
    }
    Ok(())
}

/// What a page shows after a load, or why it shows nothing.
fn shown<T>(page: &Page<T>, outcome: LoadOutcome) -> Result<&T, CliError> {
    if outcome == LoadOutcome::RedirectToLogin {
        return Err(ClientError::SessionExpired.into());
    }
    if let Some(message) = page.error() {
        return Err(CliError::Page(message.to_string()));
    }
    page.data().ok_or_else(|| CliError::Page("Nothing to show.".to_string()))
}

fn display_bound(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}
