use super::*;

fn msg(json: &str) -> MessageValue {
    MessageValue::from_json_str(json).unwrap()
}

fn parse(json: &str) -> Result<Command, CommandError> {
    parse_command(&msg(json))
}

#[test]
fn rejects_non_objects_and_bad_discriminants() {
    assert_eq!(parse("[1,2]"), Err(CommandError::NotAnObject("array")));
    assert_eq!(parse("42"), Err(CommandError::NotAnObject("number")));
    assert_eq!(parse("{}"), Err(CommandError::MissingType));
    assert_eq!(parse(r#"{"type":null}"#), Err(CommandError::MissingType));
    assert_eq!(parse(r#"{"type":7}"#), Err(CommandError::InvalidType("number")));
    assert_eq!(
        parse(r#"{"type":"TELEPORT"}"#),
        Err(CommandError::UnknownType("TELEPORT".to_string()))
    );
}

#[test]
fn unknown_type_error_carries_received_value() {
    let err = parse(r#"{"type":"teleport"}"#).unwrap_err();
    assert_eq!(err.message_type(), Some("teleport"));
    assert_eq!(err.to_string(), "unknown message type: teleport");
}

#[test]
fn unit_commands() {
    for (name, expected) in [
        ("PLAY", Command::Play),
        ("PAUSE", Command::Pause),
        ("STEP", Command::Step),
        ("CLEAR", Command::Clear),
        ("INPUT_END", Command::InputEnd),
        ("UNDO", Command::Undo),
        ("REDO", Command::Redo),
        ("CAPTURE_HISTORY", Command::CaptureHistory),
        ("SAVE_STATE", Command::SaveState),
        ("RESTORE_STATE", Command::RestoreState),
    ] {
        let parsed = parse(&format!(r#"{{"type":"{}"}}"#, name)).unwrap();
        assert_eq!(parsed.type_name(), name);
        assert_eq!(parsed, expected);
    }
}

#[test]
fn resize_clamps_dimensions() {
    assert_eq!(
        parse(r#"{"type":"RESIZE","width":0,"height":99999}"#),
        Ok(Command::Resize(Size { width: 1, height: 4096 }))
    );
    assert_eq!(
        parse(r#"{"type":"INIT","width":640.9,"height":-3}"#),
        Ok(Command::Init(Size { width: 640, height: 1 }))
    );
}

#[test]
fn viewport_has_its_own_ceiling() {
    assert_eq!(
        parse(r#"{"type":"SET_VIEWPORT","width":10000,"height":720}"#),
        Ok(Command::SetViewport(Size { width: 8192, height: 720 }))
    );
}

#[test]
fn missing_and_wrong_typed_fields_name_the_field() {
    let err = parse(r#"{"type":"RESIZE","width":100}"#).unwrap_err();
    assert_eq!(
        err,
        CommandError::MissingField { message_type: "RESIZE", field: "height" }
    );
    assert_eq!(err.field(), Some("height"));

    let err = parse(r#"{"type":"RESIZE","width":"100","height":100}"#).unwrap_err();
    assert_eq!(
        err,
        CommandError::InvalidField {
            message_type: "RESIZE",
            field: "width",
            problem: FieldProblem::Expected { expected: "number", found: "string" },
        }
    );
    assert_eq!(err.to_string(), "RESIZE: field `width` expected number, got string");
}

#[test]
fn non_finite_numbers_are_rejected() {
    let raw = MessageValue::object([
        ("type", MessageValue::from("TRANSFORM")),
        ("zoom", f64::NAN.into()),
        ("panX", 0.0.into()),
        ("panY", 0.0.into()),
    ]);
    assert_eq!(
        parse_command(&raw),
        Err(CommandError::InvalidField {
            message_type: "TRANSFORM",
            field: "zoom",
            problem: FieldProblem::NotFinite,
        })
    );
}

#[test]
fn transform_clamps_zoom_and_pan() {
    assert_eq!(
        parse(r#"{"type":"TRANSFORM","zoom":0,"panX":-5e9,"panY":12.5}"#),
        Ok(Command::Transform(CameraTransform { zoom: 0.05, pan_x: -1_000_000.0, pan_y: 12.5 }))
    );
    assert_eq!(
        parse(r#"{"type":"TRANSFORM","zoom":1000,"panX":0,"panY":2e7}"#),
        Ok(Command::Transform(CameraTransform { zoom: 50.0, pan_x: 0.0, pan_y: 1_000_000.0 }))
    );
}

#[test]
fn settings_are_partial_and_clamped() {
    assert_eq!(
        parse(r#"{"type":"SETTINGS"}"#),
        Ok(Command::Settings(SettingsUpdate::default()))
    );
    assert_eq!(
        parse(r#"{"type":"SETTINGS","gravity":{"x":-100,"y":9.8},"ambientTemperature":-500,"speed":20}"#),
        Ok(Command::Settings(SettingsUpdate {
            gravity: Some((-50.0, 9.8)),
            ambient_temperature: Some(-273.0),
            speed: Some(8.0),
        }))
    );
}

#[test]
fn settings_gravity_errors_use_dotted_names() {
    let err = parse(r#"{"type":"SETTINGS","gravity":{"x":1}}"#).unwrap_err();
    assert_eq!(err.field(), Some("gravity.y"));

    let err = parse(r#"{"type":"SETTINGS","gravity":3}"#).unwrap_err();
    assert_eq!(err.field(), Some("gravity"));
}

#[test]
fn input_parses_tool_and_shape() {
    let cmd = parse(
        r#"{"type":"INPUT","x":10.5,"y":20,"radius":900,"elementId":300,"tool":"brush","brushShape":"square"}"#,
    )
    .unwrap();
    assert_eq!(
        cmd,
        Command::Input(InputCommand {
            x: 10.5,
            y: 20.0,
            radius: 256,
            element_id: 255,
            tool: Tool::Brush,
            brush_shape: BrushShape::Square,
        })
    );

    let cmd = parse(r#"{"type":"INPUT","x":0,"y":0,"radius":3,"elementId":1,"tool":"eraser"}"#).unwrap();
    match cmd {
        Command::Input(input) => {
            assert_eq!(input.tool, Tool::Eraser);
            assert_eq!(input.brush_shape, BrushShape::Circle);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn input_rejects_unknown_keywords() {
    let err = parse(r#"{"type":"INPUT","x":0,"y":0,"radius":3,"elementId":1,"tool":"laser"}"#).unwrap_err();
    assert_eq!(
        err,
        CommandError::InvalidField {
            message_type: "INPUT",
            field: "tool",
            problem: FieldProblem::UnknownVariant("laser".to_string()),
        }
    );
    let err = parse(
        r#"{"type":"INPUT","x":0,"y":0,"radius":3,"elementId":1,"tool":"brush","brushShape":"star"}"#,
    )
    .unwrap_err();
    assert_eq!(err.field(), Some("brushShape"));
}

#[test]
fn fill_and_pipette_clamp_coordinates() {
    assert_eq!(
        parse(r#"{"type":"FILL","x":-4,"y":5000,"elementId":3}"#),
        Ok(Command::Fill(FillCommand { x: 0, y: 4096, element_id: 3 }))
    );
    assert_eq!(
        parse(r#"{"type":"PIPETTE","x":12.9,"y":7}"#),
        Ok(Command::Pipette { x: 12, y: 7 })
    );
}

#[test]
fn rigid_body_size_ceiling() {
    assert_eq!(
        parse(r#"{"type":"SPAWN_RIGID_BODY","x":50,"y":60,"size":1000,"shape":"circle","elementId":4}"#),
        Ok(Command::SpawnRigidBody(RigidBodyCommand {
            x: 50.0,
            y: 60.0,
            size: 127,
            shape: RigidShape::Circle,
            element_id: 4,
        }))
    );
    let err = parse(r#"{"type":"SPAWN_RIGID_BODY","x":50,"y":60,"size":0,"shape":"blob","elementId":4}"#)
        .unwrap_err();
    assert_eq!(err.field(), Some("shape"));
}

#[test]
fn snapshot_messages() {
    assert_eq!(parse(r#"{"type":"SNAPSHOT","id":12}"#), Ok(Command::Snapshot { id: 12 }));

    let raw = MessageValue::object([
        ("type", MessageValue::from("LOAD_SNAPSHOT")),
        ("buffer", vec![1u8, 2, 3].into()),
    ]);
    assert_eq!(parse_command(&raw), Ok(Command::LoadSnapshot { buffer: vec![1, 2, 3] }));

    // JSON arrays are not byte buffers
    let err = parse(r#"{"type":"LOAD_SNAPSHOT","buffer":[1,2,3]}"#).unwrap_err();
    assert_eq!(
        err,
        CommandError::InvalidField {
            message_type: "LOAD_SNAPSHOT",
            field: "buffer",
            problem: FieldProblem::Expected { expected: "byte buffer", found: "array" },
        }
    );
}

#[test]
fn render_mode_and_content_bundle() {
    assert_eq!(
        parse(r#"{"type":"SET_RENDER_MODE","mode":"thermal"}"#),
        Ok(Command::SetRenderMode(RenderMode::Thermal))
    );
    assert_eq!(
        parse(r#"{"type":"LOAD_CONTENT_BUNDLE","json":"{}"}"#),
        Ok(Command::LoadContentBundle { json: "{}".to_string() })
    );
    assert_eq!(
        parse(r#"{"type":"LOAD_CONTENT_BUNDLE"}"#).unwrap_err().field(),
        Some("json")
    );
}
