pub const PRESENTATION: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";
pub const XAML: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
pub const ESRI: &str = "http://schemas.esri.com/arcgis/client/2009";
pub const ESRI_MAPPING: &str = "clr-namespace:ESRI.ArcGIS.Mapping.Core;assembly=ESRI.ArcGIS.Mapping.Core";
pub const ESRI_TOOLKIT_DS: &str =
    "clr-namespace:ESRI.ArcGIS.Client.Toolkit.DataSources;assembly=ESRI.ArcGIS.Client.Toolkit.DataSources";
pub const ESRI_BING: &str = "clr-namespace:ESRI.ArcGIS.Client.Bing;assembly=ESRI.ArcGIS.Client.Bing";

/// `(attribute, uri)` pairs declared on the root of a layers document.
pub const DECLARATIONS: [(&str, &str); 6] = [
    ("xmlns", PRESENTATION),
    ("xmlns:x", XAML),
    ("xmlns:esri", ESRI),
    ("xmlns:esriMapping", ESRI_MAPPING),
    ("xmlns:esriToolkitDS", ESRI_TOOLKIT_DS),
    ("xmlns:esriBing", ESRI_BING),
];

/// Attached property prefix for builder layer extensions.
pub const EXT: &str = "esriMapping:LayerExtensions";

pub fn ext(property: &str) -> String {
    format!("{EXT}.{property}")
}
