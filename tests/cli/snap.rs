use anyhow::Result;

use crate::CliTest;

fn write_palette_project(test: &CliTest) -> Result<()> {
    test.write_file(
        "src/color.ts",
        "export type Color = number;\n\
         export const Red: Color = 0;\n\
         export const Green: Color = 1;\n\
         export const Blue: Color = 2;\n",
    )?;
    test.write_file(
        "src/palette.ts",
        "import { Color } from \"./color\";\n\
         \n\
         export interface Palette {\n\
           primary: Color;\n\
           accents: Color[];\n\
         }\n",
    )?;
    Ok(())
}

#[test]
fn test_snapshot_palette() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test
        .command()
        .args([
            "src/palette.ts:Palette",
            "-o",
            "generated/palette.ts",
            "--namespace",
            "Theme",
        ])
        .output()?;
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Wrote generated/palette.ts (2 types, 3 constants)"));

    let content = test.read_file("generated/palette.ts")?;
    insta::assert_snapshot!(content, @r#"
// Code generated by tysnap from src/palette.ts:Palette. DO NOT EDIT.

export namespace Theme {
  export type Color = number;

  export const Blue: Color = 2;
  export const Green: Color = 1;
  export const Red: Color = 0;

  export interface Palette {
    primary: Color;
    accents: Color[];
  }
}
"#);

    Ok(())
}

#[test]
fn test_unknown_type_fails_with_input_error() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test
        .command()
        .args(["src/palette.ts:Missing", "-o", "out.ts", "--namespace", "X"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("no type declaration named `Missing`"));
    assert!(!test.root().join("out.ts").exists());

    Ok(())
}

#[test]
fn test_unknown_module_fails_with_input_error() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test
        .command()
        .args(["src/nope.ts:Palette", "-o", "out.ts", "--namespace", "X"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("no module matching `src/nope.ts`"));

    Ok(())
}

#[test]
fn test_bad_locator_fails() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test.command().args(["src/palette.ts"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("expected path/to/module.ts:TypeName"));

    Ok(())
}

#[test]
fn test_namespace_inferred_from_sibling() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;
    test.write_file(
        "generated/existing.ts",
        "export namespace Theme {\n  export type Placeholder = never;\n}\n",
    )?;

    let output = test
        .command()
        .args(["src/palette.ts:Palette", "-o", "generated/palette.ts"])
        .output()?;
    assert!(output.status.success(), "{:?}", output);

    let content = test.read_file("generated/palette.ts")?;
    assert!(content.contains("export namespace Theme {"));

    Ok(())
}

#[test]
fn test_namespace_falls_back_to_directory_name() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test
        .command()
        .args(["src/palette.ts:Palette", "-o", "theme-types/palette.ts"])
        .output()?;
    assert!(output.status.success(), "{:?}", output);

    let content = test.read_file("theme-types/palette.ts")?;
    assert!(content.contains("export namespace theme_types {"));

    Ok(())
}

#[test]
fn test_module_suffix_match() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let output = test
        .command()
        .args(["palette.ts:Palette", "-o", "out/p.ts", "--namespace", "T"])
        .output()?;
    assert!(output.status.success(), "{:?}", output);

    Ok(())
}

#[test]
fn test_generated_output_is_valid_input() -> Result<()> {
    // The generated file must itself parse; extracting from it again
    // (after it has been placed in the tree) should not break scanning.
    let test = CliTest::new()?;
    write_palette_project(&test)?;

    let first = test
        .command()
        .args([
            "src/palette.ts:Palette",
            "-o",
            "gen/palette.ts",
            "--namespace",
            "Theme",
        ])
        .output()?;
    assert!(first.status.success());

    let second = test
        .command()
        .args([
            "src/palette.ts:Palette",
            "-o",
            "gen2/palette.ts",
            "--namespace",
            "Theme",
        ])
        .output()?;
    assert!(second.status.success());

    assert_eq!(
        test.read_file("gen/palette.ts")?,
        test.read_file("gen2/palette.ts")?
    );

    Ok(())
}

#[test]
fn test_config_ignores_directory() -> Result<()> {
    let test = CliTest::new()?;
    write_palette_project(&test)?;
    test.write_file(
        ".tysnaprc.json",
        r#"{ "ignores": ["**/vendored/**"] }"#,
    )?;
    // A same-named type in an ignored tree must not shadow anything.
    test.write_file("vendored/palette.ts", "export interface Palette {}\n")?;

    let output = test
        .command()
        .args(["palette.ts:Palette", "-o", "out/p.ts", "--namespace", "T"])
        .output()?;
    assert!(output.status.success(), "{:?}", output);

    let content = test.read_file("out/p.ts")?;
    assert!(content.contains("primary: Color;"));

    Ok(())
}

#[test]
fn test_help_runs() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("--namespace"));

    Ok(())
}
