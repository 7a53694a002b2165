use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use smartstock::{
    config::{self, AppConfig},
    models::planning_parameters::PlanningParameters,
    services::{
        dashboard::DashboardView,
        inventory_policy::{calculate_policy, PolicyInputs},
        planning::PlanningService,
    },
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config().context("failed to load application config")?;
    config::init_tracing(&config.log_level, config.log_json);

    match cli.command {
        Commands::Plan(args) => handle_plan(&config, args, cli.json)?,
        Commands::History(args) => handle_history(&config, args, cli.json)?,
        Commands::Forecast => handle_forecast(&config, cli.json)?,
        Commands::Policy(args) => handle_policy(args, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "smartstock",
    about = "SmartStock CLI for demand forecasting and replenishment planning",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the headline figures
    Plan(PlanArgs),
    /// Print the most recent days of sales history
    History(HistoryArgs),
    /// Print the trend line and forecast
    Forecast,
    /// Calculate a policy from explicit inputs
    Policy(PolicyArgs),
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long, help = "Fixed cost per order")]
    order_cost: Option<f64>,
    #[arg(long, help = "Annual holding cost per unit")]
    holding_cost: Option<f64>,
    #[arg(long, help = "Replenishment lead time in days (1-14)")]
    lead_time_days: Option<u32>,
    #[arg(long, help = "Service level percent (80, 85, 90, 95, 98, 99)")]
    service_level: Option<u32>,
}

impl PlanArgs {
    fn resolve(&self, defaults: &PlanningParameters) -> PlanningParameters {
        PlanningParameters {
            order_cost: self.order_cost.unwrap_or(defaults.order_cost),
            holding_cost: self.holding_cost.unwrap_or(defaults.holding_cost),
            lead_time_days: self.lead_time_days.unwrap_or(defaults.lead_time_days),
            service_level_pct: self.service_level.unwrap_or(defaults.service_level_pct),
        }
    }
}

#[derive(Args)]
struct HistoryArgs {
    #[arg(long, help = "Number of most recent days to print")]
    days: Option<usize>,
}

#[derive(Args)]
struct PolicyArgs {
    #[arg(long, help = "Forecast demand for the next 30 days")]
    monthly_forecast_total: f64,
    #[arg(long, help = "Standard deviation of daily demand")]
    std_dev: f64,
    #[arg(long, default_value_t = 100.0)]
    order_cost: f64,
    #[arg(long, default_value_t = 5.0)]
    holding_cost: f64,
    #[arg(long, default_value_t = 5)]
    lead_time_days: u32,
    #[arg(long, default_value_t = 95.0)]
    service_level: f64,
}

fn service(config: &AppConfig) -> PlanningService {
    PlanningService::from_config(config)
}

fn handle_plan(config: &AppConfig, args: PlanArgs, json: bool) -> Result<()> {
    let parameters = args.resolve(&config.planning_defaults);
    let planning = service(config);
    let result = planning
        .compute(&parameters)
        .context("planning computation failed")?;
    let view = DashboardView::from_result(&result, planning.history_window_days());

    if json {
        return print_json(&view);
    }

    let headline = &view.headline;
    println!("Monthly demand forecast : {} units", headline.monthly_forecast_units);
    println!("Economic order quantity : {} units", headline.eoq_units);
    println!("Safety stock            : {} units", headline.safety_stock_units);
    println!("Reorder point           : {} units", headline.reorder_point_units);
    println!();
    println!("{}", view.advisory);
    Ok(())
}

fn handle_history(config: &AppConfig, args: HistoryArgs, json: bool) -> Result<()> {
    let planning = service(config);
    let days = args.days.unwrap_or(planning.history_window_days());
    let history = planning.history().context("failed to generate sales history")?;
    let window = history.tail(days);

    if json {
        return print_json(&window);
    }
    for point in &window {
        println!("{}  day {:>4}  {:>5} units", point.date, point.day_index, point.units_sold);
    }
    Ok(())
}

fn handle_forecast(config: &AppConfig, json: bool) -> Result<()> {
    let forecast = service(config)
        .forecast()
        .context("failed to forecast demand")?;

    if json {
        return print_json(&forecast);
    }
    println!(
        "Trend: {:.4} units/day, intercept {:.2} ({} observations)",
        forecast.trend.slope, forecast.trend.intercept, forecast.trend.observations
    );
    for point in &forecast.points {
        println!("{}  day {:>4}  {:>8.2}", point.date, point.day_index, point.predicted_units);
    }
    println!("Next 30 days: {} units", forecast.monthly_forecast_total);
    Ok(())
}

fn handle_policy(args: PolicyArgs, json: bool) -> Result<()> {
    let policy = calculate_policy(&PolicyInputs {
        monthly_forecast_total: args.monthly_forecast_total,
        historical_std_dev: args.std_dev,
        order_cost: args.order_cost,
        holding_cost: args.holding_cost,
        lead_time_days: args.lead_time_days,
        service_level_pct: args.service_level,
    })
    .context("policy calculation failed")?;

    if json {
        return print_json(&policy);
    }
    println!("EOQ           : {:.2}", policy.eoq);
    println!("z-score       : {:.4}", policy.z_score);
    println!("Safety stock  : {:.2}", policy.safety_stock);
    println!("Reorder point : {:.2}", policy.reorder_point);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
