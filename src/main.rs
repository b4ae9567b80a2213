fn main() -> anyhow::Result<()> {
    log4j_to_slf4j::run_cli()
}
