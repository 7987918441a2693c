fn main() {
    if let Err(err) = quiz_runner_lib::run() {
        log::error!("{err:#}");
        eprintln!("quiz-runner: {err:#}");
        std::process::exit(1);
    }
}
