use crate::field::{Column, FieldSpec, FileSpec};

/// AeroDyn v14 primary input file.
pub fn aerodyn14() -> FileSpec {
    FileSpec::new(
        "AeroDyn14",
        vec![
            FieldSpec::heading("AeroDyn14 Input File"),
            FieldSpec::title("Title"),
            FieldSpec::string("StallMod")
                .with_desc("Dynamic stall included [BEDDOES or STEADY]")
                .with_unit("unquoted string"),
            FieldSpec::string("UseCm")
                .with_desc("Use aerodynamic pitching moment model? [USE_CM or NO_CM]")
                .with_unit("unquoted string"),
            FieldSpec::string("InfModel")
                .with_desc("Inflow model [DYNIN or EQUIL]")
                .with_unit("unquoted string"),
            FieldSpec::string("IndModel")
                .with_desc("Induction-factor model [NONE or WAKE or SWIRL]")
                .with_unit("unquoted string"),
            FieldSpec::float("AToler")
                .with_desc("Induction-factor tolerance (convergence criteria)"),
            FieldSpec::string("TLModel")
                .with_desc("Tip-loss model (EQUIL only) [PRANDtl, GTECH, or NONE]")
                .with_unit("unquoted string"),
            FieldSpec::string("HLModel")
                .with_desc("Hub-loss model (EQUIL only) [PRANdtl or NONE]")
                .with_unit("unquoted string"),
            FieldSpec::float("TwrShad").with_desc("Tower-shadow velocity deficit"),
            FieldSpec::float("ShadHWid")
                .with_desc("Tower-shadow half width")
                .with_unit("m"),
            FieldSpec::float("T_Shad_Refpt")
                .with_desc("Tower-shadow reference point")
                .with_unit("m"),
            FieldSpec::float("AirDens")
                .with_desc("Air density")
                .with_unit("kg/m^3"),
            FieldSpec::float("KinVisc")
                .with_desc("Kinematic air viscosity [CURRENTLY IGNORED]")
                .with_unit("m^2/sec"),
            FieldSpec::float_default("DTAero")
                .with_desc("Time interval for aerodynamic calculations")
                .with_unit("sec"),
            FieldSpec::int("NumFoil").with_desc("Number of airfoil files"),
            FieldSpec::paths("FoilNm", "NumFoil", "Foil")
                .with_desc("Names of the airfoil files [NumFoil lines]")
                .with_unit("quoted string"),
            FieldSpec::int("BldNodes").with_desc("Number of blade nodes used for analysis"),
            FieldSpec::table(
                "BldNodeData",
                "BldNodes",
                1,
                vec![
                    Column::float("RNodes"),
                    Column::float("AeroTwst"),
                    Column::float("DRNodes"),
                    Column::float("Chord"),
                    Column::int("NFoil"),
                    Column::string("PrnElm"),
                ],
            ),
        ],
    )
}
