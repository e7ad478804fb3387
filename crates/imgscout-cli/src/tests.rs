use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["imgscout"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.site.is_none());
}

#[test]
fn run_defaults_to_link_column() {
    let cli = Cli::try_parse_from([
        "imgscout", "run", "--input", "products.csv", "--output", "out.csv",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            ref input,
            ref output,
            ref column,
            kind: None,
            limit: None,
            render_js: false,
        }) if input == &PathBuf::from("products.csv")
            && output == &PathBuf::from("out.csv")
            && column == "link"
    ));
}

#[test]
fn run_accepts_column_kind_and_limit() {
    let cli = Cli::try_parse_from([
        "imgscout", "run", "--input", "skus.tsv", "--output", "out.csv", "--column", "SKU",
        "--kind", "sku", "--limit", "25",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            ref column,
            kind: Some(KindArg::Sku),
            limit: Some(25),
            ..
        }) if column == "SKU"
    ));
}

#[test]
fn run_requires_input_and_output() {
    assert!(Cli::try_parse_from(["imgscout", "run", "--input", "a.csv"]).is_err());
    assert!(Cli::try_parse_from(["imgscout", "run", "--output", "b.csv"]).is_err());
}

#[test]
fn unknown_kind_is_rejected() {
    let result = Cli::try_parse_from([
        "imgscout", "run", "--input", "a.csv", "--output", "b.csv", "--kind", "barcode",
    ]);
    assert!(result.is_err(), "expected parse error, got: {result:?}");
}

#[test]
fn site_flag_is_global() {
    let cli = Cli::try_parse_from(["imgscout", "fetch", "GE779EA0ABCD", "--site", "shop.yaml"])
        .expect("expected valid cli args");
    assert_eq!(cli.site, Some(PathBuf::from("shop.yaml")));
    assert!(matches!(
        cli.command,
        Some(Commands::Fetch { ref reference, kind: None, render_js: false }) if reference == "GE779EA0ABCD"
    ));
}

#[test]
fn fetch_with_forced_kind() {
    let cli = Cli::try_parse_from(["imgscout", "fetch", "iphone 13", "--kind", "search"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Fetch {
            kind: Some(KindArg::Search),
            ..
        })
    ));
}

#[test]
fn extract_takes_file_and_page_url() {
    let cli = Cli::try_parse_from([
        "imgscout",
        "extract",
        "--file",
        "page.html",
        "--page-url",
        "https://www.jumia.com.ng/item-1.html",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Extract { ref file, ref page_url })
            if file == &PathBuf::from("page.html")
                && page_url == "https://www.jumia.com.ng/item-1.html"
    ));
}

#[test]
fn kind_arg_maps_to_reference_kind() {
    assert_eq!(ReferenceKind::from(KindArg::Url), ReferenceKind::Url);
    assert_eq!(ReferenceKind::from(KindArg::Sku), ReferenceKind::Sku);
    assert_eq!(ReferenceKind::from(KindArg::Search), ReferenceKind::Search);
}

#[test]
fn render_js_flag_on_run_and_fetch() {
    let run = Cli::try_parse_from([
        "imgscout", "run", "--input", "a.xlsx", "--output", "b.xlsx", "--render-js",
    ])
    .expect("expected valid cli args");
    assert!(matches!(run.command, Some(Commands::Run { render_js: true, .. })));

    let fetch = Cli::try_parse_from(["imgscout", "fetch", "iphone 13", "--render-js"])
        .expect("expected valid cli args");
    assert!(matches!(fetch.command, Some(Commands::Fetch { render_js: true, .. })));
}

#[test]
fn extract_has_no_render_js_flag() {
    let result = Cli::try_parse_from([
        "imgscout", "extract", "--file", "p.html", "--page-url", "https://x.test/", "--render-js",
    ]);
    assert!(result.is_err(), "expected parse error, got: {result:?}");
}

#[test]
fn help_is_served_by_the_parser_alone() {
    let err = Cli::try_parse_from(["imgscout", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    assert!(err.to_string().contains("Harvest product image URLs"));
}
