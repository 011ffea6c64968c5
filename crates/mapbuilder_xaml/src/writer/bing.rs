use super::{LayerXamlWriter, WriteContext, attr_string, set_opt};
use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{BingLayerStyle, BingMapsLayer, BingServerType};

pub struct BingLayerXamlWriter;

impl LayerXamlWriter for BingLayerXamlWriter {
    type Kind = BingMapsLayer;

    fn element_name(&self) -> &'static str {
        "esriBing:TileLayer"
    }

    fn write_attributes(&self, kind: &BingMapsLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        if kind.layer_style != BingLayerStyle::Road {
            element.set_attr("LayerStyle", kind.layer_style.as_str());
        }
        if kind.server_type != BingServerType::Production {
            element.set_attr("ServerType", kind.server_type.as_str());
        }
        set_opt(element, "Token", kind.token.as_deref());
        if kind.culture != BingMapsLayer::DEFAULT_CULTURE {
            element.set_attr("Culture", &kind.culture);
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<BingMapsLayer> {
        let layer_style = match element.attr("LayerStyle") {
            Some(v) => {
                BingLayerStyle::from_name(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, "LayerStyle", v))?
            }
            None => BingLayerStyle::Road,
        };
        let server_type = match element.attr("ServerType") {
            Some(v) => {
                BingServerType::from_name(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, "ServerType", v))?
            }
            None => BingServerType::Production,
        };
        Ok(BingMapsLayer {
            layer_style,
            server_type,
            token: attr_string(element, "Token"),
            culture: attr_string(element, "Culture").unwrap_or_else(|| BingMapsLayer::DEFAULT_CULTURE.to_string()),
        })
    }
}
