use anyhow::Result;

fn main() -> Result<()> {
    chat_export_transformer::cli::run()
}
