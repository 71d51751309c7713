use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::resolve::{load_config, resolve_root_with_overrides};
use crate::config::RoadmapConfig;
use crate::core::course::{Category, CourseId};
use crate::core::department::Department;
use crate::data::{load_catalog, Catalog};
use crate::error::{Result, RoadmapError};
use crate::graph::check::{validate, ValidationReport};
use crate::graph::details::course_details;
use crate::graph::ops::depths;
use crate::graph::{build_graph, viz};
use crate::layout::build_layout;
use crate::store::{CompletionStore, FileStorage};
use crate::util::{logging, output};
use crate::view::{available_courses, derive_view, CategorySet, DerivedView, FilterState};

#[derive(Parser, Debug)]
#[command(name = "roadmap")]
#[command(about = "Curriculum roadmap explorer", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Departments(DepartmentsArgs),
    Layout(LayoutArgs),
    View(ViewArgs),
    Course(CourseArgs),
    Progress(ProgressArgs),
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct DepartmentsArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    pub department: Option<String>,
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    pub department: Option<String>,
    #[arg(long)]
    pub select: Option<String>,
    /// Show only these categories.
    #[arg(long = "category", value_parser = parse_category)]
    pub categories: Vec<Category>,
    /// Hide these categories. The last visible category is never hidden.
    #[arg(long = "hide", value_parser = parse_category)]
    pub hidden: Vec<Category>,
    #[arg(long)]
    pub available: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CourseArgs {
    pub department: String,
    pub course: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommand {
    Show(ProgressShowArgs),
    Toggle(ProgressToggleArgs),
    Clear(ProgressClearArgs),
}

#[derive(Args, Debug)]
pub struct ProgressShowArgs {
    pub department: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProgressToggleArgs {
    pub department: String,
    pub course: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProgressClearArgs {
    pub department: Option<String>,
    #[arg(long)]
    pub yes: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    pub department: Option<String>,
    #[arg(long)]
    pub json: bool,
}

pub fn run() {
    let cli = Cli::parse();
    output::set_color(!cli.no_color);
    output::set_quiet(cli.quiet);
    logging::init(cli.verbose, !cli.no_color);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let context = Context::load(cli.root, cli.config)?;
    match cli.command {
        Commands::Departments(args) => handle_departments(args, &context),
        Commands::Layout(args) => handle_layout(args, &context),
        Commands::View(args) => handle_view(args, &context),
        Commands::Course(args) => handle_course(args, &context),
        Commands::Progress(args) => handle_progress(args, &context),
        Commands::Check(args) => handle_check(args, &context),
    }
}

struct Context {
    root: PathBuf,
    config: RoadmapConfig,
    catalog: Catalog,
}

impl Context {
    fn load(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let cwd = env::current_dir()?;
        let resolved = resolve_root_with_overrides(cwd, root, config_path)?;
        let config = load_config(&resolved)?;
        let data_dir = resolved.root.join(&config.data.dir);
        tracing::info!(root = %resolved.root.display(), data = %data_dir.display(), "loading roadmaps");
        let catalog = load_catalog(&data_dir)?;
        Ok(Self {
            root: resolved.root,
            config,
            catalog,
        })
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join(&self.config.data.dir)
    }

    /// The requested department, else the configured default.
    fn department(&self, requested: Option<&str>) -> Result<&Department> {
        let id = requested
            .or(self.config.view.default_department.as_deref())
            .ok_or_else(|| {
                RoadmapError::Other(anyhow::anyhow!(
                    "no department given and no default_department configured"
                ))
            })?;
        Ok(self.catalog.get(id)?)
    }

    fn store(&self) -> CompletionStore<FileStorage> {
        CompletionStore::new(FileStorage::new(self.root.join(&self.config.storage.dir)))
    }
}

fn parse_category(input: &str) -> std::result::Result<Category, String> {
    Category::parse(&input.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}' (expected one of {})", input, known.join(", "))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| RoadmapError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn find_course(department: &Department, course: &str) -> Result<CourseId> {
    let id = CourseId::new(course);
    if !department.contains(&id) {
        return Err(RoadmapError::Other(anyhow::anyhow!(format!(
            "unknown course '{}' in department '{}'",
            course, department.id
        ))));
    }
    Ok(id)
}

fn handle_departments(args: DepartmentsArgs, context: &Context) -> Result<()> {
    if args.json {
        return print_json(&context.catalog.listing());
    }

    if context.catalog.is_empty() {
        output::warn(&format!(
            "no roadmaps found in {}",
            context.data_dir().display()
        ));
        return Ok(());
    }
    for entry in context.catalog.listing() {
        println!(
            "{}\t{}\t{} courses, {} credits",
            entry.id, entry.label, entry.courses, entry.credits
        );
    }
    Ok(())
}

fn handle_layout(args: LayoutArgs, context: &Context) -> Result<()> {
    let department = context.department(args.department.as_deref())?;
    let graph = build_graph(department);
    let layout = build_layout(&graph, &context.config.layout);

    match args.format.to_ascii_lowercase().as_str() {
        "text" => {
            print!("{}", viz::render_layers(&layout));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(&department.id, &layout));
            Ok(())
        }
        "json" => print_json(&layout),
        other => Err(RoadmapError::Other(anyhow::anyhow!(format!(
            "unknown layout format '{}'",
            other
        )))),
    }
}

#[derive(Serialize)]
struct ViewJson<'a> {
    department: &'a str,
    filters: &'a FilterState,
    available: Vec<CourseId>,
    #[serde(flatten)]
    view: DerivedView,
}

fn handle_view(args: ViewArgs, context: &Context) -> Result<()> {
    let department = context.department(args.department.as_deref())?;
    let graph = build_graph(department);
    let layout = build_layout(&graph, &context.config.layout);
    let completed = context.store().load(&department.id);

    let mut filters = FilterState::default();
    if let Some(categories) = CategorySet::from_categories(args.categories.iter().copied()) {
        filters.categories = categories;
    }
    for category in &args.hidden {
        if filters.categories.contains(*category) && !filters.toggle_category(*category) {
            output::warn(&format!(
                "category '{}' is the last one shown and stays visible",
                category
            ));
        }
    }
    if let Some(selected) = args.select {
        let id = CourseId::new(selected);
        if !graph.contains(&id) {
            output::warn(&format!("course '{}' is not in '{}'", id, department.id));
        }
        filters.select(id);
    }
    filters.set_available_only(args.available);

    let view = derive_view(&graph, &layout.edges, &filters, &completed);
    let available = available_courses(&graph, &completed);

    if args.json {
        return print_json(&ViewJson {
            department: &department.id,
            filters: &filters,
            available,
            view,
        });
    }

    for node in &layout.nodes {
        let Some(state) = view.node(&node.id) else {
            continue;
        };
        let mut flags = Vec::new();
        if state.highlighted {
            flags.push("selected");
        }
        if state.completed {
            flags.push("completed");
        }
        if available.contains(&node.id) {
            flags.push("available");
        }
        if state.dimmed {
            flags.push("dimmed");
        }
        println!("{}\t{}\t{}", node.id, node.name, flags.join(","));
    }
    let emphasized = view.edges.values().filter(|edge| edge.emphasized).count();
    output::info(&format!(
        "{} courses, {} edges ({} emphasized)",
        view.nodes.len(),
        view.edges.len(),
        emphasized
    ));
    Ok(())
}

fn handle_course(args: CourseArgs, context: &Context) -> Result<()> {
    let department = context.department(Some(&args.department))?;
    let id = find_course(department, &args.course)?;
    let graph = build_graph(department);
    let depths = depths(&graph);
    let details = course_details(&graph, &depths, &id).ok_or_else(|| {
        RoadmapError::Other(anyhow::anyhow!(format!("unknown course '{}'", id)))
    })?;

    if args.json {
        return print_json(&details);
    }

    println!("{} ({})", details.name, details.id);
    println!("category: {}", details.category);
    println!("credits: {}", details.credits);
    println!("layer: {}", details.depth);
    for (label, related) in [
        ("prerequisites", &details.prerequisites),
        ("dependents", &details.dependents),
        ("corequisites", &details.corequisites),
    ] {
        if related.is_empty() {
            continue;
        }
        println!("{}:", label);
        for course in related {
            println!("  {} ({})", course.name, course.id);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ProgressJson<'a> {
    department: &'a str,
    completed: Vec<&'a CourseId>,
    completed_credits: u32,
    total_credits: u32,
}

impl<'a> ProgressJson<'a> {
    fn new(department: &'a Department, completed: &'a BTreeSet<CourseId>) -> Self {
        Self {
            department: &department.id,
            completed: completed.iter().collect(),
            completed_credits: department.completed_credits(completed),
            total_credits: department.total_credits(),
        }
    }
}

fn handle_progress(args: ProgressArgs, context: &Context) -> Result<()> {
    match args.command {
        ProgressCommand::Show(show) => handle_progress_show(show, context),
        ProgressCommand::Toggle(toggle) => handle_progress_toggle(toggle, context),
        ProgressCommand::Clear(clear) => handle_progress_clear(clear, context),
    }
}

fn handle_progress_show(args: ProgressShowArgs, context: &Context) -> Result<()> {
    let department = context.department(args.department.as_deref())?;
    let mut store = context.store();
    let completed = store.activate(&department.id);

    if args.json {
        return print_json(&ProgressJson::new(department, &completed));
    }

    print_progress(department, &completed);
    Ok(())
}

fn handle_progress_toggle(args: ProgressToggleArgs, context: &Context) -> Result<()> {
    let department = context.department(Some(&args.department))?;
    let id = find_course(department, &args.course)?;
    let mut store = context.store();
    store.activate(&department.id);
    let completed = store.toggle(&department.id, &id);

    if args.json {
        return print_json(&ProgressJson::new(department, &completed));
    }

    if completed.contains(&id) {
        output::success(&format!("marked {} as completed", id));
    } else {
        output::info(&format!("unmarked {}", id));
    }
    print_progress(department, &completed);
    Ok(())
}

fn handle_progress_clear(args: ProgressClearArgs, context: &Context) -> Result<()> {
    let department = context.department(args.department.as_deref())?;
    let confirm = output::confirm(
        &format!("Clear all completed courses for '{}'?", department.id),
        args.yes,
    )
    .map_err(|err| RoadmapError::Other(anyhow::Error::new(err)))?;
    if !confirm {
        return Ok(());
    }

    let mut store = context.store();
    store.activate(&department.id);
    let completed = store.clear_all(&department.id);

    if args.json {
        return print_json(&ProgressJson::new(department, &completed));
    }
    output::success(&format!("cleared progress for {}", department.id));
    Ok(())
}

fn print_progress(department: &Department, completed: &BTreeSet<CourseId>) {
    for course in &department.courses {
        if completed.contains(&course.id) {
            println!("{}\t{}\t{}", course.id, course.name, course.credits);
        }
    }
    println!(
        "completed {}/{} credits",
        department.completed_credits(completed),
        department.total_credits()
    );
}

fn handle_check(args: CheckArgs, context: &Context) -> Result<()> {
    let reports: Vec<ValidationReport> = match args.department.as_deref() {
        Some(id) => vec![validate(context.catalog.get(id)?)],
        None => context.catalog.departments().map(validate).collect(),
    };

    if args.json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            print_validation_report(report);
        }
    }

    let cyclic: Vec<&str> = reports
        .iter()
        .filter(|report| report.has_cycles())
        .map(|report| report.department.as_str())
        .collect();
    if !cyclic.is_empty() {
        return Err(RoadmapError::Other(anyhow::anyhow!(format!(
            "prerequisite cycles found in: {}",
            cyclic.join(", ")
        ))));
    }
    Ok(())
}

fn print_validation_report(report: &ValidationReport) {
    if report.is_clean() {
        output::success(&format!("{}: ok", report.department));
        return;
    }

    println!("{}:", report.department);
    for cycle in &report.cycles {
        let members: Vec<&str> = cycle.iter().map(CourseId::as_str).collect();
        println!("  cycle: {}", members.join(" -> "));
    }
    for dangling in &report.dangling {
        println!(
            "  dangling {}: {} -> {}",
            dangling.kind, dangling.course, dangling.missing
        );
    }
    for duplicate in &report.duplicates {
        println!("  duplicate id: {}", duplicate);
    }
}
