fn main() -> anyhow::Result<()> {
    butterbackup::cli::run()
}
