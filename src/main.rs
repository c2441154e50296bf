fn main() -> anyhow::Result<()> {
    vitrine::view::run()
}
