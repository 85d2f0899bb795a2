use lucky_fruit_core::{EngineConfig, RoundEngine, Symbol};

fn main() {
    // Example end-to-end rounds: one random, one forced by the operator
    let config = EngineConfig {
        seed: Some(1),
        ..EngineConfig::default()
    };
    let engine = match RoundEngine::new(&config) {
        Ok(engine) => engine,
        Err(err) => {
            println!("bad config: {err}");
            return;
        }
    };

    match engine.spin("Player1", 100) {
        Ok(res) => println!(
            "round={} outcome={} payout={} balance={}",
            res.round, res.outcome, res.payout, res.balance
        ),
        Err(err) => println!("spin failed: {err}"),
    }

    for pos in 0..5 {
        let _ = engine.set_override_slot(pos, Some(Symbol::Strawberry));
    }
    for pos in 5..8 {
        let _ = engine.set_override_slot(pos, Some(Symbol::Lemon));
    }
    if let Err(err) = engine.arm_override() {
        println!("arm failed: {err}");
        return;
    }
    match engine.spin("Player1", 100) {
        Ok(res) => println!(
            "round={} outcome={} payout={} balance={} forced={}",
            res.round, res.outcome, res.payout, res.balance, res.forced
        ),
        Err(err) => println!("spin failed: {err}"),
    }
}
