use bubbletea_countdown::prelude::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr so they don't interleave with the pie.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(5.0);

    let mut timer = countdown_new(&[
        with_size(96),
        with_color("#e0467c"),
        with_border_color("#ffffff"),
        with_border_width(2.0),
    ]);
    timer.view_width = 32;

    let mut out = stdout();
    execute!(out, Clear(ClearType::All), cursor::Hide)?;

    let mut cmd = timer.start_with_callback(seconds, |t| {
        tracing::info!(id = t.id(), "countdown callback fired");
    });

    while let Some(next) = cmd.take() {
        let Some(msg) = next.await else { break };

        if let Some(done) = msg.downcast_ref::<CountdownCompleteMsg>() {
            execute!(out, cursor::MoveTo(0, 0), Clear(ClearType::All), cursor::Show)?;
            println!("{} finished after {seconds}s", done.id);
            break;
        }

        cmd = timer.update(msg);

        let remaining = timer.remaining_ratio().unwrap_or(0.0) * seconds;
        execute!(out, cursor::MoveTo(0, 0))?;
        write!(out, "{}\n{:>6.1}s left\n", timer.view(), remaining)?;
        out.flush()?;
    }

    Ok(())
}
