use crate::field::{Column, FieldSpec, FileSpec};

/// ElastoDyn tower properties file.
pub fn elastodyn_tower() -> FileSpec {
    let mut fields = vec![
        FieldSpec::heading("ElastoDynTower Input File"),
        FieldSpec::title("Title"),
        FieldSpec::heading("Tower Parameters"),
        FieldSpec::int("NTwInpSt").with_desc("Number of input stations to specify tower geometry"),
        FieldSpec::float("TwrFADmp(1)")
            .with_desc("Tower 1st fore-aft mode structural damping ratio")
            .with_unit("%"),
        FieldSpec::float("TwrFADmp(2)")
            .with_desc("Tower 2nd fore-aft mode structural damping ratio")
            .with_unit("%"),
        FieldSpec::float("TwrSSDmp(1)")
            .with_desc("Tower 1st side-to-side mode structural damping ratio")
            .with_unit("%"),
        FieldSpec::float("TwrSSDmp(2)")
            .with_desc("Tower 2nd side-to-side mode structural damping ratio")
            .with_unit("%"),
        FieldSpec::heading("Tower Adjustment Factors"),
        FieldSpec::float("FAStTunr(1)").with_desc("Tower fore-aft modal stiffness tuner, 1st mode"),
        FieldSpec::float("FAStTunr(2)").with_desc("Tower fore-aft modal stiffness tuner, 2nd mode"),
        FieldSpec::float("SSStTunr(1)").with_desc("Tower side-to-side stiffness tuner, 1st mode"),
        FieldSpec::float("SSStTunr(2)").with_desc("Tower side-to-side stiffness tuner, 2nd mode"),
        FieldSpec::float("AdjTwMa").with_desc("Factor to adjust tower mass density"),
        FieldSpec::float("AdjFASt").with_desc("Factor to adjust tower fore-aft stiffness"),
        FieldSpec::float("AdjSSSt").with_desc("Factor to adjust tower side-to-side stiffness"),
        FieldSpec::heading("Distributed Tower Properties"),
        FieldSpec::table(
            "TwInpSt",
            "NTwInpSt",
            2,
            vec![
                Column::float("HtFract").with_unit("-"),
                Column::float("TMassDen").with_unit("kg/m"),
                Column::float("TwFAStif").with_unit("Nm^2"),
                Column::float("TwSSStif").with_unit("Nm^2"),
            ],
        ),
    ];

    mode_shapes(&mut fields, "Tower Fore-Aft Mode Shapes", "TwFAM");
    mode_shapes(&mut fields, "Tower Side-To-Side Mode Shapes", "TwSSM");

    FileSpec::new("ElastoDynTower", fields)
}

/// Polynomial coefficients x^2..x^6 for modes 1 and 2.
fn mode_shapes(fields: &mut Vec<FieldSpec>, heading: &str, prefix: &str) {
    fields.push(FieldSpec::heading(heading));
    for mode in 1..=2 {
        for power in 2..=6 {
            let desc = if power == 2 {
                format!("Mode {mode}, coefficient of x^{power} term")
            } else {
                format!("      , coefficient of x^{power} term")
            };
            fields.push(FieldSpec::float(&format!("{prefix}{mode}Sh({power})")).with_desc(&desc));
        }
    }
}
