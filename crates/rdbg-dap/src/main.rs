use clap::Parser;

fn main() -> miette::Result<()> {
    rdbg_dap::Cli::parse().run()
}
