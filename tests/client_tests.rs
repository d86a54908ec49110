use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bingo::{
    BingoApi, BingoClient, Card, CardToken, CellId, CheckOutcome, ClientError, GameCode, Grid,
    InMemoryService, NewGame, Phase, ServiceError, SessionError,
};
use tokio::sync::Barrier;

fn card(token: &str) -> Card {
    let mut rows = [[0u32; 5]; 5];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = (c as u32) * 15 + r as u32 + 1;
        }
    }
    Card::new(CardToken::new(token).unwrap(), Grid::from_rows(rows))
}

/// Service answering from scripted replies and counting every call.
#[derive(Default)]
struct ScriptedService {
    calls: AtomicUsize,
    new_game: Mutex<Option<Result<NewGame, ServiceError>>>,
    cards: Mutex<VecDeque<Result<Option<Card>, ServiceError>>>,
    wins: HashMap<String, Result<bool, ServiceError>>,
    delays: HashMap<String, Duration>,
}

impl ScriptedService {
    fn with_cards(cards: Vec<Result<Option<Card>, ServiceError>>) -> Self {
        Self {
            cards: Mutex::new(cards.into()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BingoApi for ScriptedService {
    async fn new_game(&self) -> Result<NewGame, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.new_game
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ServiceError::Status(500)))
    }

    async fn get_card(&self, _code: &GameCode) -> Result<Option<Card>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cards.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn check_win(&self, token: &CardToken) -> Result<bool, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(token.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.wins
            .get(token.as_str())
            .cloned()
            .unwrap_or(Ok(false))
    }
}

#[tokio::test]
async fn blank_code_makes_no_call() {
    let service = Arc::new(ScriptedService::default());
    let mut client = BingoClient::new(service.clone());

    for input in ["", "   ", "\t"] {
        assert_eq!(client.join(input).await.unwrap_err(), ClientError::MissingCode);
    }
    assert_eq!(service.calls(), 0);
    assert_eq!(client.phase(), &Phase::Lobby);
}

#[tokio::test]
async fn invalid_code_stays_in_lobby() {
    let service = Arc::new(ScriptedService::with_cards(vec![Ok(None)]));
    let mut client = BingoClient::new(service.clone());

    let err = client.join("NOPE").await.unwrap_err();
    assert_eq!(err, ClientError::InvalidCode(GameCode::new("NOPE").unwrap()));
    assert_eq!(client.phase(), &Phase::Lobby);
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn unreachable_service_on_join_is_connection_error() {
    let service = Arc::new(ScriptedService::with_cards(vec![Err(
        ServiceError::Unreachable("connection refused".into()),
    )]));
    let mut client = BingoClient::new(service);

    let err = client.join("ABC123").await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(ServiceError::Unreachable(_))));
    assert!(!client.session().in_game());
}

#[tokio::test]
async fn join_discards_probe_and_holds_first_card() {
    let service = Arc::new(ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Ok(Some(card("first"))),
    ]));
    let mut client = BingoClient::new(service.clone());

    let joined = client.join("  AbC123 ").await.unwrap();
    assert_eq!(joined.code.as_str(), "AbC123");
    assert_eq!(joined.dashboard_url, None);
    assert_eq!(joined.first_card, Ok(0));

    let board = client.board().unwrap();
    assert_eq!(board.cards().len(), 1);
    assert_eq!(board.cards()[0].token().as_str(), "first");
    assert!(board.marks().is_empty());
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn failed_first_card_still_joins() {
    let service = Arc::new(ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Err(ServiceError::Status(502)),
    ]));
    let mut client = BingoClient::new(service);

    let joined = client.join("GAME1").await.unwrap();
    assert_eq!(
        joined.first_card,
        Err(ClientError::NoCard(Some(ServiceError::Status(502))))
    );
    assert!(client.session().in_game());
    assert!(client.board().unwrap().cards().is_empty());
}

#[tokio::test]
async fn failed_add_card_keeps_existing_cards() {
    let service = Arc::new(ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Ok(Some(card("first"))),
        Ok(Some(card("second"))),
        Err(ServiceError::Unreachable("timed out".into())),
        Ok(None),
    ]));
    let mut client = BingoClient::new(service);
    client.join("GAME1").await.unwrap();
    assert_eq!(client.add_card().await.unwrap(), 1);
    client.toggle_mark(CellId::new(1, 0, 0)).unwrap();

    assert!(matches!(
        client.add_card().await,
        Err(ClientError::NoCard(Some(ServiceError::Unreachable(_))))
    ));
    assert_eq!(client.add_card().await, Err(ClientError::NoCard(None)));

    let board = client.board().unwrap();
    let tokens: Vec<&str> = board.cards().iter().map(|c| c.token().as_str()).collect();
    assert_eq!(tokens, ["first", "second"]);
    assert!(board.is_marked(CellId::new(1, 0, 0)));
}

#[tokio::test]
async fn duplicate_token_is_rejected() {
    let service = Arc::new(ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Ok(Some(card("same"))),
        Ok(Some(card("same"))),
    ]));
    let mut client = BingoClient::new(service);
    client.join("GAME1").await.unwrap();

    assert_eq!(
        client.add_card().await,
        Err(ClientError::Session(SessionError::DuplicateToken))
    );
    assert_eq!(client.board().unwrap().cards().len(), 1);
}

#[tokio::test]
async fn exit_clears_cards_and_marks() {
    let service = Arc::new(ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Ok(Some(card("first"))),
        Ok(Some(card("probe2"))),
        Ok(Some(card("again"))),
    ]));
    let mut client = BingoClient::new(service);
    client.join("GAME1").await.unwrap();
    client.toggle_mark(CellId::new(0, 4, 4)).unwrap();

    let board = client.exit().unwrap();
    assert_eq!(board.cards().len(), 1);
    assert_eq!(board.marks().len(), 1);
    assert_eq!(client.phase(), &Phase::Lobby);
    assert!(client.exit().is_none());

    let joined = client.join("GAME2").await.unwrap();
    assert_eq!(joined.code.as_str(), "GAME2");
    let board = client.board().unwrap();
    assert_eq!(board.cards().len(), 1);
    assert!(board.marks().is_empty());
}

#[tokio::test]
async fn board_operations_need_a_game() {
    let service = Arc::new(ScriptedService::default());
    let mut client = BingoClient::new(service.clone());

    assert_eq!(
        client.add_card().await,
        Err(ClientError::Session(SessionError::NotInGame))
    );
    assert_eq!(
        client.toggle_mark(CellId::new(0, 0, 0)),
        Err(ClientError::Session(SessionError::NotInGame))
    );
    assert!(client.check_win().await.is_err());
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn create_carries_dashboard_url() {
    let service = ScriptedService::with_cards(vec![Ok(Some(card("first")))]);
    *service.new_game.lock().unwrap() = Some(Ok(NewGame {
        code: GameCode::new("NEW42").unwrap(),
        dashboard_url: "http://host/bingodashboard.php?bcode=NEW42".into(),
    }));
    let mut client = BingoClient::new(Arc::new(service));

    let joined = client.create().await.unwrap();
    assert_eq!(joined.code.as_str(), "NEW42");
    assert_eq!(
        joined.dashboard_url.as_deref(),
        Some("http://host/bingodashboard.php?bcode=NEW42")
    );
    assert_eq!(joined.first_card, Ok(0));
    assert_eq!(
        client.create().await.unwrap_err(),
        ClientError::Session(SessionError::AlreadyInGame)
    );
}

#[tokio::test]
async fn failed_create_stays_in_lobby() {
    let service = Arc::new(ScriptedService::default());
    let mut client = BingoClient::new(service);

    assert_eq!(
        client.create().await.unwrap_err(),
        ClientError::CreateFailed(ServiceError::Status(500))
    );
    assert_eq!(client.phase(), &Phase::Lobby);
}

#[tokio::test]
async fn check_with_no_cards_is_empty() {
    let service = Arc::new(ScriptedService::with_cards(vec![Ok(Some(card("probe"))), Ok(None)]));
    let mut client = BingoClient::new(service.clone());
    client.join("GAME1").await.unwrap();
    let before = service.calls();

    let report = client.check_win().await.unwrap();
    assert!(report.is_empty());
    assert!(!report.has_winner());
    assert_eq!(service.calls(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn mixed_outcomes_are_reported_in_card_order() -> anyhow::Result<()> {
    let mut service = ScriptedService::with_cards(vec![
        Ok(Some(card("probe"))),
        Ok(Some(card("c1"))),
        Ok(Some(card("c2"))),
        Ok(Some(card("c3"))),
        Ok(Some(card("c4"))),
    ]);
    service.wins.insert("c1".into(), Ok(false));
    service
        .wins
        .insert("c2".into(), Err(ServiceError::Unreachable("reset".into())));
    service.wins.insert("c3".into(), Ok(true));
    service.wins.insert("c4".into(), Ok(true));
    // Later cards finish first.
    service.delays.insert("c1".into(), Duration::from_millis(80));
    service.delays.insert("c2".into(), Duration::from_millis(40));
    service.delays.insert("c3".into(), Duration::from_millis(20));

    let mut client = BingoClient::new(Arc::new(service));
    client.join("GAME1").await?;
    for _ in 0..3 {
        client.add_card().await?;
    }

    let report = client.check_win().await?;
    let outcomes: Vec<CheckOutcome> = report.checks().iter().map(|c| c.outcome).collect();
    assert_eq!(
        outcomes,
        [
            CheckOutcome::NotWinner,
            CheckOutcome::Failed,
            CheckOutcome::Winner,
            CheckOutcome::Winner,
        ]
    );
    assert_eq!(report.winning_indices(), [2, 3]);
    assert_eq!(report.failed(), 1);
    assert!(client.session().in_game());
    Ok(())
}

/// Every check waits on a shared barrier, so the report can only be built if
/// all of them are in flight at once.
struct BarrierService {
    barrier: Barrier,
    cards: Mutex<VecDeque<Card>>,
}

#[async_trait]
impl BingoApi for BarrierService {
    async fn new_game(&self) -> Result<NewGame, ServiceError> {
        Err(ServiceError::Status(500))
    }

    async fn get_card(&self, _code: &GameCode) -> Result<Option<Card>, ServiceError> {
        Ok(self.cards.lock().unwrap().pop_front())
    }

    async fn check_win(&self, _token: &CardToken) -> Result<bool, ServiceError> {
        self.barrier.wait().await;
        Ok(false)
    }
}

#[tokio::test]
async fn win_checks_run_concurrently() -> anyhow::Result<()> {
    let cards: VecDeque<Card> = ["probe", "a", "b", "c"].iter().map(|t| card(t)).collect();
    let service = Arc::new(BarrierService {
        barrier: Barrier::new(3),
        cards: Mutex::new(cards),
    });
    let mut client = BingoClient::new(service);
    client.join("GAME1").await?;
    client.add_card().await?;
    client.add_card().await?;

    let report = tokio::time::timeout(Duration::from_secs(5), client.check_win()).await??;
    assert_eq!(report.len(), 3);
    assert!(!report.has_winner());
    Ok(())
}

#[tokio::test]
async fn offline_game_reaches_bingo() -> anyhow::Result<()> {
    let service = Arc::new(InMemoryService::seeded(9));
    let mut client = BingoClient::new(service.clone());

    let joined = client.create().await?;
    joined.first_card?;
    client.add_card().await?;

    let mut report = client.check_win().await?;
    assert!(!report.has_winner());
    while !report.has_winner() {
        assert!(service.draw(&joined.code).is_some(), "ran out of numbers");
        report = client.check_win().await?;
    }
    assert_eq!(report.len(), 2);
    Ok(())
}
