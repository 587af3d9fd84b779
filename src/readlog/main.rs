use clap::Parser;
use directories::ProjectDirs;
use readlog::api::ReadlogApi;
use readlog::config::ReadlogConfig;
use readlog::error::{ReadlogError, Result};
use readlog::model::{BookChanges, NewBook};
use readlog::store::handle::StoreHandle;
use readlog::store::IndexKey;
use std::path::PathBuf;

mod args;
mod logger;
mod print;

use args::{AddArgs, Cli, Commands, EditArgs, ListArgs};
use print::{
    print_book_details, print_books, print_messages, print_suggestions, print_tag_usage,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: ReadlogApi<StoreHandle>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let ctx = init_context(&cli)?;
    ctx.api.initialize()?;

    match cli.command {
        Some(Commands::Add(args)) => handle_add(&ctx, args),
        Some(Commands::List(args)) => handle_list(&ctx, args),
        Some(Commands::Show { selector }) => handle_show(&ctx, &selector),
        Some(Commands::Edit { selector, changes }) => handle_edit(&ctx, &selector, changes),
        Some(Commands::Delete { selector }) => handle_delete(&ctx, &selector),
        Some(Commands::Tags) => handle_tags(&ctx),
        Some(Commands::Suggest { prefix, exclude }) => handle_suggest(&ctx, &prefix, &exclude),
        None => handle_list(&ctx, ListArgs::default()),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };

    let config = ReadlogConfig::load(&data_dir)?;
    let db_path = config.database_path(&data_dir);
    log::debug!("Data directory: {}", data_dir.display());

    let api = ReadlogApi::new(StoreHandle::new(db_path), config);
    Ok(AppContext { api })
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "readlog", "readlog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ReadlogError::Config("Could not determine the data directory".into()))
}

fn handle_add(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let new = NewBook {
        title: args.title,
        author: args.author,
        genre: args.genre,
        pages: args.pages,
        language: args.language,
        format: args.format,
        vibes: Some(args.vibes),
        rating: args.rating.unwrap_or(0),
        notes: args.notes,
        did_not_finish: args.dnf,
        pages_read: args.pages_read,
    };
    let result = ctx.api.add_book(new)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let result = ctx.api.list_books(&list_filters(args))?;
    print_books(&result.listed_books);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, selector: &str) -> Result<()> {
    let result = ctx.api.view_book(selector)?;
    for db in &result.listed_books {
        print_book_details(db);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &AppContext, selector: &str, args: EditArgs) -> Result<()> {
    let result = ctx.api.update_book(selector, book_changes(args))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, selector: &str) -> Result<()> {
    let result = ctx.api.delete_book(selector)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_tags(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.tag_usage()?;
    print_tag_usage(&result.tag_usage);
    print_messages(&result.messages);
    Ok(())
}

fn handle_suggest(ctx: &AppContext, prefix: &str, exclude: &[String]) -> Result<()> {
    let result = ctx.api.suggest_tags(prefix, exclude)?;
    print_suggestions(&result.suggestions);
    print_messages(&result.messages);
    Ok(())
}

fn list_filters(args: ListArgs) -> Vec<IndexKey> {
    let mut filters = Vec::new();
    if let Some(title) = args.title {
        filters.push(IndexKey::Title(title));
    }
    if let Some(author) = args.author {
        filters.push(IndexKey::Author(author));
    }
    if let Some(genre) = args.genre {
        filters.push(IndexKey::Genre(genre));
    }
    if let Some(language) = args.language {
        filters.push(IndexKey::Language(language));
    }
    if let Some(format) = args.format {
        filters.push(IndexKey::Format(format));
    }
    if let Some(rating) = args.rating {
        filters.push(IndexKey::Rating(rating));
    }
    filters
}

fn book_changes(args: EditArgs) -> BookChanges {
    let vibes = if args.clear_vibes {
        Some(Vec::new())
    } else if args.vibes.is_empty() {
        None
    } else {
        Some(args.vibes)
    };

    let (did_not_finish, pages_read) = if args.finished {
        (Some(false), Some(None))
    } else {
        (args.dnf.then_some(true), args.pages_read.map(Some))
    };

    BookChanges {
        title: args.title,
        author: args.author,
        genre: args.genre,
        pages: args.pages,
        language: args.language,
        format: args.format,
        vibes,
        rating: args.rating,
        notes: args.notes,
        did_not_finish,
        pages_read,
    }
}
