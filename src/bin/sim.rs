use std::sync::Arc;

use bingo::{BingoClient, InMemoryService};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed> <cards>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let cards: usize = args[2].parse()?;
    if cards == 0 {
        anyhow::bail!("need at least one card");
    }

    let service = Arc::new(InMemoryService::seeded(seed));
    let mut client = BingoClient::new(service.clone());

    let joined = client.create().await?;
    joined.first_card?;
    while client.board()?.cards().len() < cards {
        client.add_card().await?;
    }

    let mut draws = 0;
    let report = loop {
        if service.draw(&joined.code).is_none() {
            anyhow::bail!("ran out of numbers without a winner");
        }
        draws += 1;
        let report = client.check_win().await?;
        if report.has_winner() {
            break report;
        }
    };

    let winners: Vec<usize> = report.winning_indices().iter().map(|i| i + 1).collect();
    let result = json!({
        "code": joined.code.to_string(),
        "cards": client.board()?.cards().len(),
        "draws": draws,
        "called": service.called(&joined.code),
        "winners": winners,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
