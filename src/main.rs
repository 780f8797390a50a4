use std::io::{self, BufRead, Write};

use rosterd::ipc;
use rosterd::store::MongoStore;

fn main() {
    // The store must be reachable before the shell gets a prompt; there is
    // no degraded mode and no reconnection.
    let store = match MongoStore::connect() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("rosterd: {e:#}");
            std::process::exit(1);
        }
    };
    let mut state = ipc::AppState::new(Box::new(store));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with an id; report and move on.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
