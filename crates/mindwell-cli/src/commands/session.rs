use chrono::Utc;
use clap::Subcommand;
use mindwell_core::storage::database::ENGINE_KEY;
use mindwell_core::storage::{Config, Database};
use mindwell_core::{Event, SessionConfig, SessionEngine, Technique, TechniqueId, ToneKind};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a guided session
    Start {
        /// Technique id: breathing, meditation, visualization, progressive
        technique: TechniqueId,
        /// Session length in minutes (3, 5, 10, 15, or 20)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Restore full remaining time without leaving the session
    Reset,
    /// End the session without completing it
    Stop,
    /// Advance the session clock by N seconds
    Tick {
        #[arg(long, default_value = "1")]
        seconds: u64,
    },
    /// Print current session state as JSON
    Status,
    /// List available techniques
    List,
    /// Emit a test tone and narration line to check voice settings
    TestVoice,
}

fn load_engine(db: &Database) -> Option<SessionEngine> {
    let json = db.kv_get(ENGINE_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn save_engine(db: &Database, engine: &SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Render engine events: persist completion records, narrate guidance when
/// voice is on, and echo the event stream as JSON.
fn handle_events(
    db: &Database,
    voice_enabled: bool,
    events: &[Event],
) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        match event {
            Event::SessionCompleted { record, .. } => {
                db.record_session(record)?;
            }
            Event::Guidance { text, .. } if voice_enabled => {
                eprintln!("voice> {text}");
            }
            Event::PhaseEntered { instruction, .. } if voice_enabled => {
                eprintln!("voice> {instruction}");
            }
            _ => {}
        }
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();

    match action {
        SessionAction::Start { technique, minutes } => {
            if let Some(engine) = load_engine(&db) {
                use mindwell_core::SessionStatus::*;
                if matches!(engine.status(), Running | Paused) {
                    return Err(mindwell_core::SessionError::AlreadyRunning.into());
                }
            }
            let minutes = minutes.unwrap_or(config.session.default_duration_min);
            let session_config =
                SessionConfig::from_catalog(technique, minutes, config.voice.enabled)?;
            let mut engine = SessionEngine::new(session_config);
            let events = engine.start()?;
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Pause => {
            let mut engine = require_engine(&db)?;
            let events = engine.pause()?;
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Resume => {
            let mut engine = require_engine(&db)?;
            let events = engine.resume()?;
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Reset => {
            let mut engine = require_engine(&db)?;
            let events = engine.reset()?;
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Stop => {
            let mut engine = require_engine(&db)?;
            let events = engine.stop();
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Tick { seconds } => {
            let mut engine = require_engine(&db)?;
            let mut events = Vec::new();
            for _ in 0..seconds {
                events.extend(engine.tick());
            }
            handle_events(&db, config.voice.enabled, &events)?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Status => match load_engine(&db) {
            Some(engine) => {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
            None => println!("{{\"type\": \"no_session\"}}"),
        },
        SessionAction::List => {
            let listing: Vec<serde_json::Value> = Technique::all()
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id.as_str(),
                        "title": t.title,
                        "description": t.description,
                        "instructions": t.instructions,
                        "phases": t.phases(),
                        "guidance_interval_secs": t.guidance_interval_secs,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        SessionAction::TestVoice => {
            let events = vec![Event::Tone {
                kind: ToneKind::Test,
                at: Utc::now(),
            }];
            handle_events(&db, config.voice.enabled, &events)?;
            if config.voice.enabled {
                eprintln!("voice> This is a test of the voice guidance system.");
            } else {
                println!("voice guidance is disabled; run `config set voice.enabled true`");
            }
        }
    }

    Ok(())
}

fn require_engine(db: &Database) -> Result<SessionEngine, Box<dyn std::error::Error>> {
    load_engine(db).ok_or_else(|| "no session in progress; run `session start` first".into())
}
