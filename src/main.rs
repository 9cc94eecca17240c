use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let book_dir = env::args_os().nth(1).map(PathBuf::from);
    bookline::runtime::run(book_dir)
}
