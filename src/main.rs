//! Dev helper: `cargo run` packs the wasm bundle into `static/pkg` and serves
//! `static/` locally. Set `PORT` to change the listening port.

use std::process::{Child, Command, Stdio};
use std::{env, io, thread, time::Duration};

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8000;
const SITE_DIR: &str = "static";

fn pack_bundle() -> Result<()> {
    println!("packing wasm bundle into {SITE_DIR}/pkg");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir"])
        .arg(format!("{SITE_DIR}/pkg"))
        .status();
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => bail!("wasm-pack failed ({status})"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("wasm-pack is not installed; serving whatever is already in {SITE_DIR}/pkg");
            Ok(())
        }
        Err(err) => Err(err).context("running wasm-pack"),
    }
}

fn serve(port: u16) -> Result<Child> {
    println!("serving {SITE_DIR}/ at http://127.0.0.1:{port}");
    Command::new("python3")
        .args(["-m", "http.server"])
        .arg(port.to_string())
        .args(["--directory", SITE_DIR])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("starting python3 http.server")
}

fn main() -> Result<()> {
    let port = match env::var("PORT") {
        Ok(raw) => raw.parse().with_context(|| format!("invalid PORT {raw:?}"))?,
        Err(_) => DEFAULT_PORT,
    };

    pack_bundle()?;
    let mut server = serve(port)?;
    loop {
        if let Some(status) = server.try_wait()? {
            bail!("http server exited: {status}");
        }
        thread::sleep(Duration::from_secs(1));
    }
}
