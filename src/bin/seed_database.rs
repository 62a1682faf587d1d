#!/usr/bin/env cargo
//! Crystal tracking database seeder
//!
//! Walks a running API through one full fragment-screening setup: plate
//! catalog, a project, a compound library plate, a crystal plate and a
//! transfer batch pairing them. Library and imaging files can be supplied;
//! otherwise synthetic ones are generated.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:3000 --token YOUR_JWT_TOKEN`

use clap::{Arg, ArgAction, Command};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, multipart};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tokio::time::Duration;

const LIBRARY_PLATE_TYPE: &str = "1536LDV";
const XTAL_PLATE_TYPE: &str = "SwissCI-MRC-2d";
const DROP_CODES: [&str; 5] = ["c", "ul", "ur", "dl", "dr"];
const FRAGMENTS: [&str; 6] = [
    "CCO",
    "c1ccccc1O",
    "CC(=O)Nc1ccc(O)cc1",
    "OC(=O)c1ccccc1",
    "Nc1ncnc2[nH]cnc12",
    "CN1CCC[C@H]1c1cccnc1",
];

type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone)]
pub struct SeedingConfig {
    pub base_url: String,
    pub jwt_token: String,
    pub client: Client,
}

/// Where the plate files come from and how big generated ones are
#[derive(Debug, Clone)]
pub struct SeedInputs {
    pub library_csv: Option<PathBuf>,
    pub imaging_log: Option<PathBuf>,
    pub library_plate_name: String,
    pub xtal_plate_name: String,
    pub wells: usize,
    pub transfer_volume: i32,
}

#[derive(Debug, Default)]
pub struct CreatedObjects {
    pub catalog: Option<Value>,
    pub project: Option<Value>,
    pub library_plate: Option<Value>,
    pub xtal_plate: Option<Value>,
    pub batch: Option<Value>,
}

pub struct DatabaseSeeder {
    config: SeedingConfig,
    inputs: SeedInputs,
    created_objects: CreatedObjects,
}

/// Library well names of a 1536 plate in row-major order (`A01` .. `AF48`)
fn library_well_names() -> impl Iterator<Item = String> {
    let rows = ('A'..='Z')
        .map(String::from)
        .chain(('A'..='F').map(|second| format!("A{second}")));
    rows.flat_map(|row| (1..=48).map(move |column| format!("{row}{column:02}")))
}

/// Shifter positions of an MRC 2-drop plate in row-major order (`A1a`, `A1b`, ...)
fn shifter_positions() -> impl Iterator<Item = (char, u32, char)> {
    ('A'..='H').flat_map(|row| {
        (1..=12).flat_map(move |column| ['a', 'b'].map(|subwell| (row, column, subwell)))
    })
}

fn generate_library_csv(wells: usize) -> String {
    let mut csv = String::from("well,catalog_id,smiles\n");
    for (index, well) in library_well_names().take(wells).enumerate() {
        let smiles = FRAGMENTS[index % FRAGMENTS.len()];
        csv.push_str(&format!("{well},Z{:07},{smiles}\n", 1_000_000 + index));
    }
    csv
}

fn generate_imaging_log(plate_name: &str, wells: usize) -> String {
    let mut log = String::from(
        "; Rock Imager drop export\n; generated by seed_database\n;PlateType,PlateID,PlateRow,PlateColumn,PositionSubWell,ExternalComment\n",
    );
    for (index, (row, column, subwell)) in shifter_positions().take(wells).enumerate() {
        let drop = DROP_CODES[index % DROP_CODES.len()];
        log.push_str(&format!(
            "{XTAL_PLATE_TYPE},{plate_name},{row},{column},{subwell},[{drop}]\n"
        ));
    }
    log
}

fn step_spinner(message: &str) -> SeedResult<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Ok(pb)
}

impl DatabaseSeeder {
    pub fn new(base_url: String, jwt_token: String, inputs: SeedInputs) -> SeedResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            config: SeedingConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                jwt_token,
                client,
            },
            inputs,
            created_objects: CreatedObjects::default(),
        })
    }

    async fn read_response(response: reqwest::Response, endpoint: &str) -> SeedResult<Value> {
        if response.status().is_success() {
            Ok(response.json::<Value>().await?)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(format!("HTTP {status} {endpoint}: {error_text}").into())
        }
    }

    async fn post_json(&self, endpoint: &str, data: Option<Value>) -> SeedResult<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut request = self
            .config
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.config.jwt_token));
        if let Some(json_data) = data {
            request = request.json(&json_data);
        }
        Self::read_response(request.send().await?, endpoint).await
    }

    async fn post_multipart(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
        file_name: &str,
        file_content: Vec<u8>,
    ) -> SeedResult<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut form = multipart::Form::new();
        for (name, value) in fields {
            form = form.text((*name).to_string(), (*value).to_string());
        }
        form = form.part(
            "file",
            multipart::Part::bytes(file_content)
                .file_name(file_name.to_string())
                .mime_str("text/csv")?,
        );

        let response = self
            .config
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.config.jwt_token))
            .multipart(form)
            .send()
            .await?;
        Self::read_response(response, endpoint).await
    }

    /// File contents and upload name, read from disk or generated
    fn plate_file(
        path: Option<&PathBuf>,
        fallback_name: &str,
        generate: impl FnOnce() -> String,
    ) -> SeedResult<(String, Vec<u8>)> {
        match path {
            Some(path) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(fallback_name)
                    .to_string();
                Ok((name, fs::read(path)?))
            }
            None => Ok((fallback_name.to_string(), generate().into_bytes())),
        }
    }

    pub async fn seed_catalog(&mut self) -> SeedResult<()> {
        println!("{} Seeding plate catalog...", style("[1/5]").bold().dim());
        let pb = step_spinner("Well types, well map and drop positions")?;

        let result = self.post_json("/api/catalog/seed", None).await?;
        pb.finish_with_message(format!(
            "Catalog ready ({} crystal well types created)",
            result["xtal_well_types_created"]
        ));
        self.created_objects.catalog = Some(result);
        Ok(())
    }

    pub async fn create_project(&mut self) -> SeedResult<()> {
        println!("{} Creating project...", style("[2/5]").bold().dim());
        let pb = step_spinner("Endothiapepsin fragment screen")?;

        let result = self
            .post_json(
                "/api/projects",
                Some(json!({
                    "target": "Endothiapepsin",
                    "proposal_id": 20_241_234,
                    "year": 2024,
                    "cycle": 2,
                    "visit": 1
                })),
            )
            .await?;
        pb.finish_with_message(format!("Project {}", result["id"]));
        self.created_objects.project = Some(result);
        Ok(())
    }

    pub async fn upload_library_plate(&mut self) -> SeedResult<()> {
        println!("{} Uploading library plate...", style("[3/5]").bold().dim());
        let wells = self.inputs.wells;
        let (file_name, content) = Self::plate_file(
            self.inputs.library_csv.as_ref(),
            "library.csv",
            || generate_library_csv(wells),
        )?;
        let pb = step_spinner(&format!("Processing {file_name}"))?;

        let result = self
            .post_multipart(
                "/api/plates/library",
                &[
                    ("plate_name", self.inputs.library_plate_name.as_str()),
                    ("plate_type", LIBRARY_PLATE_TYPE),
                ],
                &file_name,
                content,
            )
            .await?;
        pb.finish_with_message(format!("{} library wells created", result["wells_created"]));
        self.report_skipped(&result);
        self.created_objects.library_plate = Some(result);
        Ok(())
    }

    pub async fn upload_xtal_plate(&mut self) -> SeedResult<()> {
        println!("{} Uploading crystal plate...", style("[4/5]").bold().dim());
        let wells = self.inputs.wells;
        let plate_name = self.inputs.xtal_plate_name.clone();
        let (file_name, content) = Self::plate_file(
            self.inputs.imaging_log.as_ref(),
            "imaging.csv",
            || generate_imaging_log(&plate_name, wells),
        )?;
        let pb = step_spinner(&format!("Processing {file_name}"))?;

        let result = self
            .post_multipart("/api/plates/xtal", &[], &file_name, content)
            .await?;
        pb.finish_with_message(format!("{} crystal wells created", result["wells_created"]));
        self.report_skipped(&result);
        self.created_objects.xtal_plate = Some(result);
        Ok(())
    }

    pub async fn create_batch(&mut self) -> SeedResult<()> {
        println!("{} Planning transfer batch...", style("[5/5]").bold().dim());
        let id_of = |object: &Option<Value>, path: &[&str]| -> SeedResult<String> {
            let mut value = object.as_ref().ok_or("missing prerequisite object")?;
            for key in path {
                value = &value[*key];
            }
            Ok(value.as_str().ok_or("response has no id")?.to_string())
        };
        let library_plate_id = id_of(&self.created_objects.library_plate, &["plate", "id"])?;
        let xtal_plate_id = id_of(&self.created_objects.xtal_plate, &["plate", "id"])?;
        let project_id = id_of(&self.created_objects.project, &["id"])?;

        let available = |plate: &Option<Value>| {
            plate
                .as_ref()
                .and_then(|p| p["plate"]["available_wells"].as_u64())
                .unwrap_or(0)
        };
        let count = available(&self.created_objects.library_plate)
            .min(available(&self.created_objects.xtal_plate));
        if count == 0 {
            println!("{} No wells available, skipping batch", style("!").yellow());
            return Ok(());
        }

        let pb = step_spinner(&format!("Pairing {count} wells"))?;
        let result = self
            .post_json(
                "/api/batches",
                Some(json!({
                    "library_plate_id": library_plate_id,
                    "xtal_plate_id": xtal_plate_id,
                    "project_id": project_id,
                    "count": count,
                    "volume": self.inputs.transfer_volume
                })),
            )
            .await?;
        pb.finish_with_message(format!("Batch {} planned", result["name"]));
        self.created_objects.batch = Some(result);
        Ok(())
    }

    fn report_skipped(&self, report: &Value) {
        let skipped = report["skipped"].as_array().map_or(0, Vec::len);
        if skipped > 0 {
            println!(
                "  {} {} rows skipped",
                style("!").yellow(),
                style(skipped).bold()
            );
        }
    }

    pub async fn seed_database(&mut self) -> SeedResult<()> {
        println!();
        println!("{}", style("Crystal Tracking Seeder").bold().blue());
        println!("{}", style("Creating a complete screening setup...").dim());
        println!();

        self.seed_catalog().await?;
        self.create_project().await?;
        self.upload_library_plate().await?;
        self.upload_xtal_plate().await?;
        self.create_batch().await?;

        self.display_summary();
        Ok(())
    }

    fn display_summary(&self) {
        println!();
        println!("{}", style("Seeding complete").bold().green());
        println!("{}", style("=".repeat(50)).dim());

        let count = |value: &Option<Value>, key: &str| {
            value
                .as_ref()
                .map_or_else(|| "-".to_string(), |v| v[key].to_string())
        };
        let summary_data = [
            ("Well types", count(&self.created_objects.catalog, "xtal_well_types_created")),
            ("Library wells", count(&self.created_objects.library_plate, "wells_created")),
            ("Crystal wells", count(&self.created_objects.xtal_plate, "wells_created")),
            ("Batch", count(&self.created_objects.batch, "name")),
        ];
        for (name, value) in summary_data {
            println!("{:.<20} {}", style(name).cyan(), style(value).bold().green());
        }

        if let Some(batch_id) = self
            .created_objects
            .batch
            .as_ref()
            .and_then(|b| b["id"].as_str())
        {
            println!();
            println!("Echo protocol:");
            println!(
                "  {}",
                style(format!("{}/api/batches/{batch_id}/echo", self.config.base_url)).dim()
            );
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> SeedResult<()> {
    let matches = Command::new("Crystal Tracking Seeder")
        .version("0.1")
        .about("Seeds the crystal tracking database with a catalog, plates and a transfer batch")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .value_name("JWT_TOKEN")
                .help("JWT authentication token")
                .required(true),
        )
        .arg(
            Arg::new("library-csv")
                .long("library-csv")
                .value_name("FILE")
                .help("Library plate CSV (well, catalog_id, smiles); generated when omitted")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("imaging-csv")
                .long("imaging-csv")
                .value_name("FILE")
                .help("Crystal imaging log; generated when omitted")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("library-plate")
                .long("library-plate")
                .value_name("NAME")
                .help("Library plate name")
                .default_value("DSi-Poised-01"),
        )
        .arg(
            Arg::new("xtal-plate")
                .long("xtal-plate")
                .value_name("NAME")
                .help("Crystal plate name used for generated imaging logs")
                .default_value("XP-0001"),
        )
        .arg(
            Arg::new("wells")
                .long("wells")
                .value_name("COUNT")
                .help("Wells per generated plate")
                .default_value("48")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("volume")
                .long("volume")
                .value_name("NL")
                .help("Transfer volume in nL")
                .default_value("25")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide the token preview")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let required = |name: &str| -> SeedResult<String> {
        matches
            .get_one::<String>(name)
            .cloned()
            .ok_or_else(|| format!("missing --{name}").into())
    };
    let base_url = required("url")?;
    let jwt_token = required("token")?;
    let inputs = SeedInputs {
        library_csv: matches.get_one::<PathBuf>("library-csv").cloned(),
        imaging_log: matches.get_one::<PathBuf>("imaging-csv").cloned(),
        library_plate_name: required("library-plate")?,
        xtal_plate_name: required("xtal-plate")?,
        wells: matches.get_one::<usize>("wells").copied().unwrap_or(48),
        transfer_volume: matches.get_one::<i32>("volume").copied().unwrap_or(25),
    };

    println!("{}", style("Crystal Tracking Seeder v0.1").bold());
    println!("{}", style("-".repeat(40)).dim());
    println!("API URL: {}", style(&base_url).cyan());
    if !matches.get_flag("quiet") {
        println!(
            "Token:   {}...{}",
            style("*".repeat(8)).dim(),
            style(&jwt_token[jwt_token.len().saturating_sub(8)..]).dim()
        );
    }

    let mut seeder = DatabaseSeeder::new(base_url, jwt_token, inputs)?;
    seeder.seed_database().await?;

    Ok(())
}
