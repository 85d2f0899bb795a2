use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lucky_fruit_core::Symbol;
use lucky_fruit_shared::{
    AccountView, AdminGrantRequest, AdminSetSlotRequest, ErrorBody, HistoryResponse,
    OverrideStatusResponse, SpinRequest, SpinResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "lucky-fruit-cli", about = "Operator CLI for the Lucky Fruit server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Server base URL
    #[arg(long, env = "LUCKY_FRUIT_URL", default_value = "http://127.0.0.1:8080")]
    server: String,
    /// Bearer token for admin commands
    #[arg(long, env = "API_KEY", default_value = "dev-key")]
    api_key: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round
    Spin { user: String, wager: u64 },
    /// Show one player's balance and winnings
    Account { user: String },
    /// Show every player
    Accounts,
    /// Show recent rounds, newest first
    History,
    /// Add funds to a player without counting them as winnings
    Grant { user: String, amount: u64 },
    /// Stage a symbol for the next round ("random" clears the slot)
    SetSlot { position: usize, symbol: String },
    /// Drop every staged slot
    ClearOverride,
    /// Force the staged symbols on the next round
    Arm,
    /// Show staged slots
    OverrideStatus,
    /// Export recent rounds to CSV path
    ExportCsv { path: String },
}

struct Api {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl Api {
    fn new(base: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, admin: bool) -> anyhow::Result<T> {
        let mut req = self.http.get(format!("{}{}", self.base, path));
        if admin {
            req = req.bearer_auth(&self.api_key);
        }
        Self::decode(req.send().await?).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        admin: bool,
    ) -> anyhow::Result<T> {
        let mut req = self.http.post(format!("{}{}", self.base, path));
        if admin {
            req = req.bearer_auth(&self.api_key);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Self::decode(req.send().await?).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.context("malformed response");
        }
        match resp.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({}): {}", status, body.error, body.message),
            Err(_) => bail!("request failed: {}", status),
        }
    }
}

fn render(outcome: &[Symbol]) -> String {
    outcome.iter().map(|s| s.emoji()).collect::<Vec<_>>().join(" ")
}

fn print_override(status: &OverrideStatusResponse) {
    let slots: Vec<String> = status
        .slots
        .iter()
        .map(|s| s.map(|s| s.name().to_string()).unwrap_or_else(|| "-".into()))
        .collect();
    println!(
        "[{}] {}/8{}",
        slots.join(", "),
        status.populated,
        if status.armed { " armed" } else { "" }
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = Api::new(cli.server, cli.api_key);

    match cli.command {
        Commands::Spin { user, wager } => {
            let res: SpinResponse = api
                .post("/spin", Some(&SpinRequest { user, wager }), false)
                .await?;
            println!(
                "round #{} {} payout={} balance={} winnings={}{}",
                res.round,
                render(&res.outcome),
                res.payout,
                res.balance,
                res.cumulative_winnings,
                if res.forced { " (forced)" } else { "" }
            );
        }
        Commands::Account { user } => {
            let a: AccountView = api.get(&format!("/accounts/{user}"), false).await?;
            println!("{} balance={} won={}", a.user, a.balance, a.cumulative_winnings);
        }
        Commands::Accounts => {
            let all: Vec<AccountView> = api.get("/accounts", false).await?;
            for a in all {
                println!("{:<12} balance={:>10} won={:>10}", a.user, a.balance, a.cumulative_winnings);
            }
        }
        Commands::History => {
            let h: HistoryResponse = api.get("/history", false).await?;
            println!("next round #{}", h.current_round);
            for entry in h.entries {
                println!("#{:>6} {}", entry.round, render(&entry.outcome));
            }
        }
        Commands::Grant { user, amount } => {
            let a: AccountView = api
                .post("/admin/grant", Some(&AdminGrantRequest { user, amount }), true)
                .await?;
            println!("{} balance={}", a.user, a.balance);
        }
        Commands::SetSlot { position, symbol } => {
            let symbol = if symbol.eq_ignore_ascii_case("random") {
                None
            } else {
                Some(symbol.parse::<Symbol>()?.id().to_string())
            };
            let status: OverrideStatusResponse = api
                .post(
                    "/admin/override/slot",
                    Some(&AdminSetSlotRequest { position, symbol }),
                    true,
                )
                .await?;
            print_override(&status);
        }
        Commands::ClearOverride => {
            let status: OverrideStatusResponse = api
                .post::<(), _>("/admin/override/clear", None, true)
                .await?;
            print_override(&status);
        }
        Commands::Arm => {
            let status: OverrideStatusResponse = api
                .post::<(), _>("/admin/override/arm", None, true)
                .await?;
            print_override(&status);
        }
        Commands::OverrideStatus => {
            let status: OverrideStatusResponse = api.get("/admin/override", true).await?;
            print_override(&status);
        }
        Commands::ExportCsv { path } => {
            let h: HistoryResponse = api.get("/history", false).await?;
            let mut wtr = csv::Writer::from_path(&path)?;
            let mut header = vec!["round".to_string()];
            header.extend((1..=8).map(|i| format!("slot{i}")));
            wtr.write_record(&header)?;
            for entry in &h.entries {
                let mut record = vec![entry.round.to_string()];
                record.extend(entry.outcome.iter().map(|s| s.id().to_string()));
                wtr.write_record(&record)?;
            }
            wtr.flush()?;
            println!("Exported {} rows to {}", h.entries.len(), path);
        }
    }

    Ok(())
}
