use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use text_input_sources::config::Config;
use text_input_sources::notifications;
use text_input_sources::{
    Category, CurrentVariant, DryRunPlatform, FilterMap, FilteringPropertyName, InputSource, Kind, Platform,
    TextInputSources, TisError,
};

#[derive(Parser, Debug)]
#[command(name = "tisctl")]
#[command(about = "Просмотр и переключение источников ввода macOS")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "tis.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция, система не меняется)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,

    /// Вывод в JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Список источников по фильтру
    List(ListArgs),
    /// Свойства одного источника
    Show { id: String },
    /// Текущий источник
    Current {
        #[arg(value_enum, default_value_t = CurrentArg::Any)]
        variant: CurrentArg,
    },
    /// Лучший источник для языка
    Language { tag: String },
    /// Включённые ASCII-совместимые раскладки
    Ascii,
    Select { id: String },
    Deselect { id: String },
    Enable { id: String },
    Disable { id: String },
    /// Зарегистрировать источники из бандла
    Register { path: PathBuf },
    /// Показать, задать или снять раскладку для методов ввода
    Override {
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
    /// Имена уведомлений об изменениях
    Notifications,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Включая установленные, но не включённые
    #[arg(long)]
    all: bool,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    kind: Option<Kind>,
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    bundle_id: Option<String>,
    #[arg(long)]
    enabled: Option<bool>,
    #[arg(long)]
    selected: Option<bool>,
    #[arg(long)]
    ascii_capable: Option<bool>,
    #[arg(long)]
    select_capable: Option<bool>,
    #[arg(long)]
    enable_capable: Option<bool>,
    #[arg(long)]
    input_mode_id: Option<String>,
    #[arg(long)]
    localized_name: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CurrentArg {
    Any,
    Layout,
    Ascii,
    AsciiLayout,
}

impl From<CurrentArg> for CurrentVariant {
    fn from(arg: CurrentArg) -> Self {
        match arg {
            CurrentArg::Any => CurrentVariant::Any,
            CurrentArg::Layout => CurrentVariant::Layout,
            CurrentArg::Ascii => CurrentVariant::AsciiCapable,
            CurrentArg::AsciiLayout => CurrentVariant::AsciiCapableLayout,
        }
    }
}

impl ListArgs {
    fn filter(&self) -> Result<FilterMap> {
        let mut filter = FilterMap::new();
        if let Some(category) = self.category {
            filter = filter.with_category(category);
        }
        if let Some(kind) = self.kind {
            filter = filter.with_kind(kind);
        }
        if let Some(id) = &self.id {
            filter = filter.with_id(id.clone());
        }
        if let Some(bundle_id) = &self.bundle_id {
            filter = filter.with_bundle_id(bundle_id.clone());
        }
        if let Some(enabled) = self.enabled {
            filter = filter.with_enabled(enabled);
        }
        if let Some(selected) = self.selected {
            filter = filter.with_selected(selected);
        }
        if let Some(ascii_capable) = self.ascii_capable {
            filter = filter.with_ascii_capable(ascii_capable);
        }
        if let Some(select_capable) = self.select_capable {
            filter = filter.with_select_capable(select_capable);
        }
        if let Some(enable_capable) = self.enable_capable {
            filter = filter.with(FilteringPropertyName::EnableCapability, enable_capable)?;
        }
        if let Some(input_mode_id) = &self.input_mode_id {
            filter = filter.with(FilteringPropertyName::InputModeId, input_mode_id.as_str())?;
        }
        if let Some(localized_name) = &self.localized_name {
            filter = filter.with(FilteringPropertyName::LocalizedName, localized_name.as_str())?;
        }
        Ok(filter)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск tisctl v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - состояние системы не меняется");
        let sources = TextInputSources::new(DryRunPlatform::new(config.dry_run_sources()));
        return run(&sources, &args, &config);
    }

    run_system(&args, &config)
}

#[cfg(target_os = "macos")]
fn run_system(args: &Args, config: &Config) -> Result<()> {
    run(&TextInputSources::system(), args, config)
}

#[cfg(not(target_os = "macos"))]
fn run_system(_args: &Args, _config: &Config) -> Result<()> {
    anyhow::bail!("Служба источников ввода есть только в macOS, используйте --dry-run")
}

fn run<P: Platform>(sources: &TextInputSources<P>, args: &Args, config: &Config) -> Result<()> {
    info!("Платформа: {}", sources.platform().name());

    match &args.command {
        Command::List(list) => {
            let include_all = list.all || config.query.include_all_installed;
            print_list(&sources.find(&list.filter()?, include_all), args.json)?;
        }
        Command::Show { id } => print_one(&lookup(sources, id)?, args.json)?,
        Command::Current { variant } => print_one(&sources.current_variant((*variant).into()), args.json)?,
        Command::Language { tag } => match sources.input_source_for_language(tag) {
            Some(source) => print_one(&source, args.json)?,
            None => anyhow::bail!("Нет источника для языка {}", tag),
        },
        Command::Ascii => print_list(&sources.ascii_capable_input_sources(), args.json)?,
        Command::Select { id } => sources.select(&lookup(sources, id)?)?,
        Command::Deselect { id } => sources.deselect(&lookup(sources, id)?)?,
        Command::Enable { id } => sources.enable(&lookup(sources, id)?)?,
        Command::Disable { id } => sources.disable(&lookup(sources, id)?)?,
        Command::Register { path } => sources.register_input_source(path)?,
        Command::Override { id: Some(id), .. } => {
            sources.set_override_keyboard_layout(Some(&lookup(sources, id)?))?
        }
        Command::Override { clear: true, .. } => sources.set_override_keyboard_layout(None)?,
        Command::Override { .. } => match sources.override_keyboard_layout() {
            Some(source) => print_one(&source, args.json)?,
            None => println!("Переопределение раскладки не задано"),
        },
        Command::Notifications => {
            for name in notifications::ALL {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Источник по id среди всех установленных
fn lookup<P: Platform>(sources: &TextInputSources<P>, id: &str) -> Result<InputSource<P>> {
    let filter = FilterMap::new().with_id(id);
    sources
        .find(&filter, true)
        .into_iter()
        .next()
        .ok_or_else(|| TisError::SourceNotFound(id.to_string()).into())
}

fn print_one<P: Platform>(source: &InputSource<P>, json: bool) -> Result<()> {
    let description = source.describe();
    if json {
        println!("{}", serde_json::to_string_pretty(&description)?);
    } else {
        println!("{}", description);
    }
    Ok(())
}

fn print_list<P: Platform>(sources: &[InputSource<P>], json: bool) -> Result<()> {
    if json {
        let descriptions: Vec<_> = sources.iter().map(InputSource::describe).collect();
        println!("{}", serde_json::to_string_pretty(&descriptions)?);
        return Ok(());
    }

    for source in sources {
        let description = source.describe();
        println!("{}", description);
    }
    if sources.is_empty() {
        warn!("Ни один источник не подошёл под фильтр");
    }
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // Логи в stderr, чтобы не смешиваться с JSON на stdout
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
