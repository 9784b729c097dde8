use anyhow::Context;
use chaosboard::{BoardConfig, MessageBoard, config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    let config = BoardConfig::from_env().context("invalid configuration")?;
    logging::init(&config.log_level);

    let board = MessageBoard::from_config(&config);
    board.initialize().await;

    let state = board.state();
    for message in &state.messages {
        println!(
            "[{}] {} <{}>\n{}\n",
            message.created_at, message.username, message.email, message.content
        );
    }
    let pagination = state.pagination;
    println!(
        "page {}/{} ({} messages)",
        pagination.page, pagination.total_pages, pagination.total
    );
    Ok(())
}
