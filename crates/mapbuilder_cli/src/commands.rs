use crate::errors::{CliError, CliResult};
use mapbuilder_config::BuilderConfig;
use mapbuilder_json::{JavaScriptSerializer, JsonWriter};
use mapbuilder_model::{FieldInfo, Layer};
use mapbuilder_popup::PopupInfo;
use mapbuilder_tools::{CommandRegistry, ToolPanels};
use mapbuilder_xaml::{XmlWriteOptions, read_layers as read_layers_document, write_layers};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::info;

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_serde<T: DeserializeOwned>(path: &Path, what: &'static str) -> CliResult<T> {
    serde_json::from_str(&read_file(path)?).map_err(|source| CliError::Serde {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn serializer(config: &BuilderConfig) -> JavaScriptSerializer {
    JavaScriptSerializer::new().with_recursion_limit(config.json.recursion_limit)
}

fn write_options(config: &BuilderConfig) -> XmlWriteOptions {
    XmlWriteOptions {
        indent: config.xaml.indent,
        xml_declaration: config.xaml.xml_declaration,
        ..XmlWriteOptions::default()
    }
}

fn report_warnings<W: Display>(warnings: &[W]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

pub fn json(path: &Path, pretty: bool, config: &BuilderConfig) -> CliResult<()> {
    let value = serializer(config).deserialize_object(&read_file(path)?)?;
    let mut writer = if pretty || config.json.pretty {
        JsonWriter::pretty(config.json.indent.as_str())
    } else {
        JsonWriter::new()
    };
    writer.write_value(&value)?;
    println!("{}", writer.into_string());
    Ok(())
}

pub fn layers(path: &Path, config: &BuilderConfig) -> CliResult<()> {
    let layers: Vec<Layer> = read_serde(path, "layer list")?;
    let (xml, warnings) = write_layers(&layers, &write_options(config))?;
    info!(layers = layers.len(), warnings = warnings.len(), "layers written");
    report_warnings(&warnings);
    println!("{xml}");
    Ok(())
}

pub fn read_layers(path: &Path, config: &BuilderConfig) -> CliResult<()> {
    let (layers, warnings) = read_layers_document(&read_file(path)?, &serializer(config))?;
    report_warnings(&warnings);
    let json = serde_json::to_string_pretty(&layers).map_err(|source| CliError::Serde {
        what: "layer list",
        path: path.to_path_buf(),
        source,
    })?;
    println!("{json}");
    Ok(())
}

pub fn toolpanels(path: &Path, config: &BuilderConfig) -> CliResult<()> {
    let registry = CommandRegistry::pass_through();
    let (panels, load_warnings) = ToolPanels::load(&read_file(path)?, &registry)?;
    report_warnings(&load_warnings);
    let (xml, save_warnings) = panels.save_with(&write_options(config))?;
    report_warnings(&save_warnings);
    println!("{xml}");
    Ok(())
}

pub fn popup(path: &Path, fields: Option<&Path>, config: &BuilderConfig) -> CliResult<()> {
    let info = PopupInfo::from_json(&read_file(path)?, &serializer(config))?;
    let fields: Vec<FieldInfo> = match fields {
        Some(fields_path) => read_serde(fields_path, "field list")?,
        None => Vec::new(),
    };
    println!("{}", info.get_or_compile(&fields));
    Ok(())
}
