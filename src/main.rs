fn main() -> anyhow::Result<()> {
    logconf::run()
}
