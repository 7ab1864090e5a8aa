//! Stdin/stdout driver: one session step per input line.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use convograph::CompiledFlow;

/// Runs a session over the flow until it finishes or stdin closes.
///
/// Prints the start node's greeting, then reads one line per turn, steps the
/// session, and prints the ASSISTANT messages it returns.
pub async fn run(flow: Arc<CompiledFlow>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = flow.session();

    let greeting = session.start().await?;
    for m in &greeting.messages {
        println!("Agent: {}", m.content);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.is_finished() {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let text = line?;
        let out = session.step(text.trim()).await?;
        for m in &out.messages {
            println!("Agent: {}", m.content);
        }
        if out.finished {
            println!("(session finished)");
        }
    }

    Ok(())
}
