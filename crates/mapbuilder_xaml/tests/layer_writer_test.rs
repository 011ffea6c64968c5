use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::*;
use mapbuilder_xaml::*;

fn write(layer: &Layer) -> (XamlElement, Vec<XamlWarning>) {
    let mut ctx = WriteContext::new();
    let element = write_layer(layer, &mut ctx).unwrap();
    (element, ctx.into_warnings())
}

fn round_trip(layer: &Layer) -> Layer {
    let (element, _) = write(layer);
    let xml = element.to_xml_string().unwrap();
    let parsed = XamlElement::parse(&xml).unwrap();
    read_layer(&parsed, &JavaScriptSerializer::new()).unwrap()
}

fn marker(color: Color) -> Symbol {
    Symbol::SimpleMarker(SimpleMarkerSymbol {
        color,
        ..Default::default()
    })
}

#[test]
fn test_opacity_written_only_below_one() {
    let layer = Layer::new("base", LayerKind::TiledMapService(TiledMapServiceLayer::default()));
    let (element, _) = write(&layer);
    assert_eq!(element.attr("Opacity"), None);

    let (element, _) = write(&layer.clone().with_opacity(0.5));
    assert_eq!(element.attr("Opacity"), Some("0.5"));
}

#[test]
fn test_default_layer_writes_only_id() {
    for kind in [
        LayerKind::DynamicMapService(DynamicMapServiceLayer::default()),
        LayerKind::ImageService(ImageServiceLayer::default()),
        LayerKind::Feature(FeatureLayer::default()),
        LayerKind::Graphics(GraphicsSettings::default()),
        LayerKind::HeatMap(HeatMapLayer::default()),
        LayerKind::Kml(KmlLayer::default()),
        LayerKind::Wms(WmsLayer::default()),
        LayerKind::Bing(BingMapsLayer::default()),
    ] {
        let (element, _) = write(&Layer::new("L1", kind));
        assert_eq!(element.attributes, vec![("ID".to_string(), "L1".to_string())], "{}", element.name);
        assert!(element.children.is_empty(), "{}", element.name);
    }
}

#[test]
fn test_element_names_per_kind() {
    let cases = [
        (LayerKind::DynamicMapService(Default::default()), "esri:ArcGISDynamicMapServiceLayer"),
        (LayerKind::TiledMapService(Default::default()), "esri:ArcGISTiledMapServiceLayer"),
        (LayerKind::ImageService(Default::default()), "esri:ArcGISImageServiceLayer"),
        (LayerKind::Feature(Default::default()), "esri:FeatureLayer"),
        (LayerKind::Graphics(Default::default()), "esri:GraphicsLayer"),
        (LayerKind::GeoRss(Default::default()), "esriToolkitDS:GeoRssLayer"),
        (LayerKind::HeatMap(Default::default()), "esriToolkitDS:HeatMapLayer"),
        (LayerKind::HeatMapFeature(Default::default()), "esriMapping:HeatMapFeatureLayer"),
        (LayerKind::Kml(Default::default()), "esriToolkitDS:KmlLayer"),
        (LayerKind::Wms(Default::default()), "esriToolkitDS:WmsLayer"),
        (LayerKind::Bing(Default::default()), "esriBing:TileLayer"),
    ];
    for (kind, name) in cases {
        let (element, _) = write(&Layer::new("x", kind));
        assert_eq!(element.name, name);
    }
}

#[test]
fn test_unserializable_class_breaks_renderer_is_omitted_but_siblings_remain() {
    let renderer = Renderer::ClassBreaks(ClassBreaksRenderer {
        field: "POP".into(),
        classes: vec![
            ClassBreakInfo {
                minimum_value: 0.0,
                maximum_value: 100.0,
                symbol: Some(marker(Color::RED)),
                ..Default::default()
            },
            ClassBreakInfo {
                minimum_value: 100.0,
                maximum_value: 1000.0,
                symbol: Some(Symbol::Runtime {
                    type_name: "AnimatedMarker".into(),
                }),
                ..Default::default()
            },
        ],
        ..Default::default()
    });
    let mut feature = FeatureLayer {
        connection: ServiceConnection::new("http://host/FeatureServer/0"),
        ..Default::default()
    };
    feature.graphics.renderer = Some(renderer);
    feature.graphics.clusterer = Some(Clusterer::Flare(FlareClusterer::default()));
    let mut layer = Layer::new("cities", LayerKind::Feature(feature));
    layer.extensions.fields = vec![FieldInfo::new("POP", FieldType::Integer)];

    let (element, warnings) = write(&layer);
    assert!(element.child("esri:FeatureLayer.Renderer").is_none());
    assert!(element.child("esri:FeatureLayer.Clusterer").is_some());
    assert!(element.child("esriMapping:LayerExtensions.Fields").is_some());
    assert_eq!(
        warnings,
        vec![XamlWarning {
            layer_id: "cities".into(),
            kind: XamlWarningKind::RendererOmitted
        }]
    );
}

#[test]
fn test_custom_clusterer_is_fatal_for_the_layer_only() {
    let graphics = GraphicsSettings {
        clusterer: Some(Clusterer::Custom {
            type_name: "HexClusterer".into(),
        }),
        ..Default::default()
    };
    let bad = Layer::new("bad", LayerKind::Graphics(graphics));
    let mut ctx = WriteContext::new();
    assert!(matches!(
        write_layer(&bad, &mut ctx),
        Err(XamlError::UnsupportedClusterer { .. })
    ));

    let good = Layer::new("good", LayerKind::TiledMapService(TiledMapServiceLayer::default()));
    let (root, warnings) = write_layers_element(&[bad, good]);
    assert_eq!(root.elements().count(), 1);
    assert_eq!(root.first_element().and_then(|e| e.attr("ID")), Some("good"));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].layer_id, "bad");
}

#[test]
fn test_feature_collection_embeds_dataset() {
    let mut graphic = PersistedGraphic::new(Geometry::Point(MapPoint::new(10.0, 20.0)));
    graphic.attributes.insert("NAME", "Pier");
    graphic.symbol = Some(marker(Color::from_rgb(0, 0, 255)));
    let mut feature = FeatureLayer::default();
    feature.graphics.graphics = vec![graphic];

    let layer = Layer::new("notes", LayerKind::Feature(feature.clone()));
    let (element, warnings) = write(&layer);
    assert!(warnings.is_empty());
    let dataset = element.child("esriMapping:LayerExtensions.GraphicsDataset").unwrap();
    assert!(dataset.text().starts_with(r#"[{"geometry":{"x":10,"y":20}"#));
    assert_eq!(round_trip(&layer), layer);

    feature.connection = ServiceConnection::new("http://host/FeatureServer/1");
    let (element, _) = write(&Layer::new("notes", LayerKind::Feature(feature)));
    assert!(element.child("esriMapping:LayerExtensions.GraphicsDataset").is_none());
}

#[test]
fn test_dataset_failure_is_swallowed() {
    let mut graphic = PersistedGraphic::new(Geometry::Point(MapPoint::new(0.0, 0.0)));
    graphic.symbol = Some(Symbol::Runtime {
        type_name: "Blink".into(),
    });
    let settings = GraphicsSettings {
        graphics: vec![graphic],
        ..Default::default()
    };
    let (element, warnings) = write(&Layer::new("sketch", LayerKind::Graphics(settings)));
    assert!(element.child("esriMapping:LayerExtensions.GraphicsDataset").is_none());
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0].kind, XamlWarningKind::GraphicsDatasetOmitted { .. }));
}

#[test]
fn test_base_and_extension_attributes_round_trip() {
    let mut layer = Layer::new("ops", LayerKind::DynamicMapService(DynamicMapServiceLayer::default()))
        .with_opacity(0.25)
        .with_display_name("Operations");
    layer.visible = false;
    layer.minimum_resolution = 0.5;
    layer.maximum_resolution = 5000.0;
    layer.extensions.auto_update_interval = 30.0;
    layer.extensions.is_reference_layer = true;
    layer.extensions.is_basemap = true;
    layer.extensions.geometry_type = Some(GeometryType::Polygon);
    layer.extensions.display_field = Some("NAME".into());
    layer.extensions.use_popup_from_web_map = true;
    layer.extensions.identify_layer_ids = vec![0, 3];
    layer.extensions.popup_templates = vec![PopupTemplateOverride {
        layer_id: 3,
        template: "<DataTemplate><TextBlock Text=\"{Binding [NAME]}\"/></DataTemplate>".into(),
    }];
    layer.extensions.fields = vec![FieldInfo {
        name: "URL".into(),
        display_name: Some("Link".into()),
        field_type: FieldType::Hyperlink,
        visible_in_attribute_display: false,
        visible_on_map_tip: true,
    }];
    layer.extensions.layer_infos = vec![LayerInformation {
        id: 3,
        name: "Parcels".into(),
        popups_enabled: true,
        display_field: Some("APN".into()),
        fields: vec![FieldInfo::new("APN", FieldType::Text)],
    }];

    let (element, _) = write(&layer);
    assert_eq!(element.attr("Visible"), Some("False"));
    assert_eq!(element.attr("esriMapping:LayerExtensions.IsBaseMapLayer"), Some("True"));
    let ids = element.child("esriMapping:LayerExtensions.IdentifyLayerIds").unwrap();
    assert_eq!(ids.elements().map(|e| e.text()).collect::<Vec<_>>(), ["0", "3"]);

    assert_eq!(round_trip(&layer), layer);
}

#[test]
fn test_service_kinds_round_trip() {
    let layers = vec![
        Layer::new(
            "dyn",
            LayerKind::DynamicMapService(DynamicMapServiceLayer {
                connection: ServiceConnection {
                    url: Some("http://h/MapServer".into()),
                    proxy_url: Some("http://proxy".into()),
                    token: Some("abc".into()),
                },
                image_format: "PNG32".into(),
                disable_client_caching: true,
                visible_layers: Some(vec![0, 2]),
                layer_definitions: vec![LayerDefinition {
                    layer_id: 2,
                    definition: "POP > 1000 AND NAME <> 'x'".into(),
                }],
            }),
        ),
        Layer::new(
            "img",
            LayerKind::ImageService(ImageServiceLayer {
                connection: ServiceConnection::new("http://h/ImageServer"),
                image_format: "JPG".into(),
                band_ids: Some(vec![3, 2, 1]),
                compression_quality: 75,
                no_data: Some(-9999.0),
                interpolation: "BilinearInterpolation".into(),
            }),
        ),
        Layer::new(
            "heat",
            LayerKind::HeatMap(HeatMapLayer {
                intensity: 4.0,
                gradient: vec![
                    GradientStop::new(Color::TRANSPARENT, 0.0),
                    GradientStop::new(Color::RED, 1.0),
                ],
                points: vec![MapPoint::new(1.0, 2.0), MapPoint::new(-3.5, 4.0)],
            }),
        ),
        Layer::new(
            "heatfs",
            LayerKind::HeatMapFeature(HeatMapFeatureLayer {
                connection: ServiceConnection::new("http://h/FeatureServer/0"),
                where_clause: Some("TYPE = 'A'".into()),
                intensity: 12.0,
                gradient: vec![GradientStop::new(Color::WHITE, 0.5)],
            }),
        ),
        Layer::new(
            "kml",
            LayerKind::Kml(KmlLayer {
                url: Some("http://h/doc.kmz".into()),
                proxy_url: None,
                visible_layers: Some(vec!["Roads".into(), "Rivers".into()]),
                refresh_interval: 60.0,
            }),
        ),
        Layer::new(
            "wms",
            LayerKind::Wms(WmsLayer {
                url: Some("http://h/wms".into()),
                proxy_url: Some("http://proxy".into()),
                version: "1.3.0".into(),
                layers: vec!["0".into(), "1".into()],
                skip_get_capabilities: true,
                image_format: "image/jpeg".into(),
            }),
        ),
        Layer::new(
            "bing",
            LayerKind::Bing(BingMapsLayer {
                layer_style: BingLayerStyle::AerialWithLabels,
                server_type: BingServerType::Staging,
                token: Some("key".into()),
                culture: "fr-FR".into(),
            }),
        ),
        Layer::new(
            "rss",
            LayerKind::GeoRss(GeoRssLayer {
                url: Some("http://h/feed.xml".into()),
                proxy_url: None,
                graphics: GraphicsSettings {
                    renderer: Some(Renderer::Simple(SimpleRenderer {
                        symbol: Some(marker(Color::BLACK)),
                        label: Some("Quakes".into()),
                        description: None,
                    })),
                    renderer_takes_precedence: false,
                    ..Default::default()
                },
            }),
        ),
    ];
    for layer in &layers {
        assert_eq!(&round_trip(layer), layer, "{}", layer.id);
    }
}

#[test]
fn test_renderers_round_trip() {
    let unique = Renderer::UniqueValue(UniqueValueRenderer {
        field: "TYPE".into(),
        default_label: Some("Other".into()),
        default_symbol: Some(Symbol::SimpleFill(SimpleFillSymbol::default())),
        infos: vec![
            UniqueValueInfo {
                value: "A".into(),
                label: Some("Alpha".into()),
                description: Some("first".into()),
                symbol: Some(Symbol::SimpleLine(SimpleLineSymbol {
                    width: 3.0,
                    style: LineStyle::Dash,
                    ..Default::default()
                })),
            },
            UniqueValueInfo {
                value: "B".into(),
                symbol: Some(Symbol::Text(TextSymbol {
                    text: "B".into(),
                    font_family: Some("Arial".into()),
                    font_size: 14.0,
                    foreground: Color::WHITE,
                })),
                ..Default::default()
            },
        ],
    });
    let breaks = Renderer::ClassBreaks(ClassBreaksRenderer {
        field: "POP".into(),
        default_label: None,
        default_symbol: None,
        classes: vec![ClassBreakInfo {
            minimum_value: 0.0,
            maximum_value: 10.5,
            label: Some("small".into()),
            description: None,
            symbol: Some(Symbol::PictureMarker(PictureMarkerSymbol {
                source: "http://h/pin.png".into(),
                width: 16.0,
                height: 16.0,
                offset_y: -8.0,
                ..Default::default()
            })),
        }],
    });
    for renderer in [unique, breaks] {
        let graphics = GraphicsSettings {
            renderer: Some(renderer),
            clusterer: Some(Clusterer::Flare(FlareClusterer {
                maximum_flare_count: 4,
                gradient: vec![GradientStop::new(Color::RED, 0.0), GradientStop::new(Color::BLACK, 1.0)],
                flare_foreground: Some(Brush::LinearGradient {
                    start_point: BrushPoint::new(0.0, 0.5),
                    end_point: BrushPoint::new(1.0, 0.5),
                    stops: vec![GradientStop::new(Color::WHITE, 0.0)],
                }),
                ..Default::default()
            })),
            ..Default::default()
        };
        let layer = Layer::new("g", LayerKind::Graphics(graphics));
        assert_eq!(round_trip(&layer), layer);
    }
}

#[test]
fn test_layers_document_round_trip() {
    let layers = vec![
        Layer::new("base", LayerKind::TiledMapService(TiledMapServiceLayer {
            connection: ServiceConnection::new("http://h/World/MapServer"),
        }))
        .with_display_name("Topographic"),
        Layer::new("ops", LayerKind::Feature(FeatureLayer {
            connection: ServiceConnection::new("http://h/FeatureServer/0"),
            mode: FeatureLayerMode::Snapshot,
            where_clause: Some("1=1".into()),
            out_fields: vec!["*".into()],
            on_demand_cache_size: 200,
            auto_save: false,
            ..Default::default()
        })),
    ];
    let (xml, warnings) = write_layers(&layers, &XmlWriteOptions::default()).unwrap();
    assert!(warnings.is_empty());
    assert!(xml.starts_with("<esri:Map.Layers xmlns="));
    assert!(xml.contains(r#"xmlns:esriMapping="clr-namespace:ESRI.ArcGIS.Mapping.Core;assembly=ESRI.ArcGIS.Mapping.Core""#));

    let (back, warnings) = read_layers(&xml, &JavaScriptSerializer::new()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(back, layers);
}

#[test]
fn test_read_layers_skips_unknown_elements() {
    let xml = r#"<esri:Map xmlns:esri="http://schemas.esri.com/arcgis/client/2009">
        <esri:Map.Layers>
            <esri:ArcGISTiledMapServiceLayer ID="a" Url="http://h/MapServer"/>
            <custom:ThirdPartyLayer ID="b"/>
        </esri:Map.Layers>
    </esri:Map>"#;
    let (layers, warnings) = read_layers(xml, &JavaScriptSerializer::new()).unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].id, "a");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].layer_id, "b");
}
