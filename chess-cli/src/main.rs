use anyhow::Result;
use chess_cli::{
    help_text, parse_color, parse_user_input, BoardRenderer, Command, Game, Settings, UserInput,
};
use chess_core::{Color, Position};
use chess_llm::LlmEngine;
use rustyline::config::Configurer;
use rustyline::Editor;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 一次输入的结果
enum Turn {
    Played,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    // 初始化日志
    let level = settings.log_level.as_str();
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["chess_core", "chess_llm", "chess_cli", "llm_chess"] {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // 首次运行时写出默认设置，便于手动编辑
    if Settings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {:#}", e);
        }
    }

    let mut engine = LlmEngine::new(settings.chat_config())?;
    engine.set_max_retries(settings.max_retries);
    engine.set_offer_legal_moves(settings.offer_legal_moves);
    let llm_name = engine.config().model.clone();
    info!("Using model {} at {}", llm_name, engine.config().base_url);

    let renderer = BoardRenderer::new(settings.guide, settings.ascii);
    let mut editor = Editor::<()>::new();
    editor.set_auto_add_history(true);

    println!("{}", renderer.render(&Position::initial()));
    println!("{}\n", help_text());

    let human = loop {
        match editor.readline("w/b >> ") {
            Ok(line) => match parse_color(&line) {
                Some(color) => break color,
                None => println!("Invalid color. Try again."),
            },
            Err(_) => return Ok(()),
        }
    };

    let mut game = Game::new(human);

    loop {
        if let Some(result) = game.outcome() {
            println!("{}", renderer.render(game.position()));
            println!("{} ({})", result, result.score());
            break;
        }

        if game.is_human_turn() {
            match read_move(&mut editor, &mut game, &renderer, "Enter your move >> ") {
                Turn::Played => continue,
                Turn::Quit => break,
            }
        }

        let llm = game.human().opponent();
        match engine.suggest_move(game.position()).await {
            Ok(suggestion) => match game.apply_suggestion(&suggestion) {
                Ok(san) => {
                    let comment = suggestion.comment.as_deref().unwrap_or("");
                    println!("\nLLM) {}. \"{}\"\n", san, comment);
                    println!("{}", renderer.render(game.position()));
                }
                Err(e) => {
                    warn!("Validated suggestion failed to apply: {}", e);
                    if let Turn::Quit = ask_for_llm_move(&mut editor, &mut game, &renderer, llm) {
                        break;
                    }
                }
            },
            Err(e) => {
                warn!("LLM move failed: {:#}", e);
                println!("\nThe LLM could not produce a legal move: {:#}", e);
                if let Turn::Quit = ask_for_llm_move(&mut editor, &mut game, &renderer, llm) {
                    break;
                }
            }
        }
    }

    let transcript = game.position().transcript();
    if !transcript.is_empty() {
        println!("\nSAN: {}", transcript);
    }
    match game.record(&llm_name) {
        Ok(record) => info!("Game record:\n{}", record.to_llm_format()),
        Err(e) => warn!("Could not build game record: {}", e),
    }

    Ok(())
}

fn ask_for_llm_move(
    editor: &mut Editor<()>,
    game: &mut Game,
    renderer: &BoardRenderer,
    llm: Color,
) -> Turn {
    let prompt = format!("Enter the move for {} >> ", llm.name());
    read_move(editor, game, renderer, &prompt)
}

/// 读取一行输入直到有一步合法走法被执行或用户退出
fn read_move(
    editor: &mut Editor<()>,
    game: &mut Game,
    renderer: &BoardRenderer,
    prompt: &str,
) -> Turn {
    loop {
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(_) => return Turn::Quit,
        };

        match parse_user_input(&line) {
            Ok(UserInput::Move(text)) => match game.play(&text) {
                Ok(_) => {
                    println!("\n{}", renderer.render(game.position()));
                    return Turn::Played;
                }
                Err(e) => {
                    println!("\n{}", renderer.render(game.position()));
                    println!("Invalid move: {}. Try again.", e);
                }
            },
            Ok(UserInput::Command(Command::Resign)) => {
                let result = game.resign();
                println!("{} ({})", result, result.score());
                return Turn::Quit;
            }
            Ok(UserInput::Command(Command::Quit)) => return Turn::Quit,
            Ok(UserInput::Command(command)) => println!("{}", game.command_output(command)),
            Err(e) => println!("{}", e),
        }
    }
}
