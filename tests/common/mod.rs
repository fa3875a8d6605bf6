//! Shared raw processor table fixture

use polars::prelude::*;

type Cells = [Option<&'static str>; 8];

fn text(name: &str, cells: Cells) -> Column {
    Column::new(name.into(), cells.to_vec())
}

fn repeat(name: &str, cell: &'static str) -> Column {
    text(name, [Some(cell); 8])
}

/// Eight processors with gaps in most columns
pub fn raw_table() -> DataFrame {
    DataFrame::new(vec![
        text("Product_Collection", [
            Some("Legacy Intel Xeon Processors"),
            Some("7th Generation Intel Core i7 Processors"),
            None,
            Some("Intel Atom Processor C Series"),
            Some("7th Generation Intel Core i7 Processors"),
            Some("Intel Celeron Processor G Series"),
            Some("Legacy Intel Xeon Processors"),
            Some("Intel Atom Processor C Series"),
        ]),
        text("Vertical_Segment", [
            Some("Server"), Some("Mobile"), Some("Desktop"), Some("Embedded"),
            Some("Mobile"), Some("Desktop"), Some("Server"), Some("Embedded"),
        ]),
        text("Processor_Number", [
            Some("E5-2699V4"), Some("i7-7700HQ"), Some("i7-4770K"), Some("C3958"),
            Some("i7-7820HK"), Some("G3900"), Some("E5-2695V4"), None,
        ]),
        text("Status", [
            Some("Launched"), Some("End of Life"), None, Some("Announced"),
            Some("Launched"), Some("End of Interactive Support"), Some("Launched"), Some("Launched"),
        ]),
        text("Launch_Date", [
            Some("Q1'16"), Some("Q1'17"), None, Some("Q3'17"),
            Some("Q1'17"), Some("Q4'15"), Some("Q1'16"), Some("Q3'17"),
        ]),
        text("Lithography", [
            Some("14 nm"), Some("14 nm"), Some("22 nm"), None,
            Some("14 nm"), Some("22 nm"), Some("32 nm"), Some("22 nm"),
        ]),
        text("Recommended_Customer_Price", [
            Some("$4115.00"), Some("$303.00"), None, Some("$1,000.00 - $1,200.00"),
            Some("$393.00"), Some("$42.00"), Some("$2,000.00"), Some("$75.00"),
        ]),
        text("nb_of_Cores", [Some("22"), Some("4"), None, Some("8"), Some("4"), Some("2"), Some("18"), Some("4")]),
        text("nb_of_Threads", [Some("44"), Some("8"), Some("4"), None, Some("8"), Some("2"), Some("36"), Some("4")]),
        text("Processor_Base_Frequency", [
            Some("2.20 GHz"), Some("2.80 GHz"), Some("3.40 GHz"), Some("2.00 GHz"),
            None, Some("800 MHz"), Some("2.10 GHz"), Some("2.40 GHz"),
        ]),
        text("Max_Turbo_Frequency", [
            Some("3.60 GHz"), Some("3.80 GHz"), Some("3.90 GHz"), None,
            Some("3.90 GHz"), None, Some("3.30 GHz"), None,
        ]),
        text("Cache", [
            Some("55 MB SmartCache"), Some("6 MB SmartCache"), Some("8 MB"), None,
            Some("6 MB SmartCache"), Some("2 MB"), Some("45 MB SmartCache"), Some("512 KB L2"),
        ]),
        text("Bus_Speed", [
            Some("9.6 GT/s QPI"), Some("8 GT/s DMI3"), Some("5 GT/s DMI"), None,
            Some("8 GT/s DMI3"), Some("8 GT/s DMI3"), Some("9.6 GT/s QPI"), Some("2.5 GT/s DMI"),
        ]),
        text("TDP", [
            Some("145 W"), Some("45 W"), Some("84 W"), Some("25 W"),
            None, Some("54 W"), Some("145 W"), Some("20 W"),
        ]),
        text("Embedded_Options_Available", [
            Some("No"), Some("No"), Some("No"), Some("Yes"), Some("No"), Some("No"), Some("No"), Some("Yes"),
        ]),
        text("Conflict_Free", [
            Some("Yes"), None, Some("Yes"), Some("Yes"), Some("Yes"), Some("Yes"), None, Some("Yes"),
        ]),
        text("Max_Memory_Size", [
            Some("1.5 TB"), Some("64 GB"), Some("32 GB"), Some("128 GB"),
            None, Some("64 GB"), Some("1.5 TB"), Some("64 GB"),
        ]),
        text("Memory_Types", [
            Some("DDR4 1600/1866/2133/2400"), Some("DDR4-2400, LPDDR3-2133"), Some("DDR3-1333/1600"), None,
            Some("DDR4-2400, LPDDR3-2133"), Some("DDR4-1866/2133, DDR3L-1333/1600"), Some("DDR4 2400"), Some("DDR3L 1600"),
        ]),
        text("Max_nb_of_Memory_Channels", [Some("4"), Some("2"), Some("2"), Some("2"), None, Some("2"), Some("4"), Some("1")]),
        text("Max_Memory_Bandwidth", [
            Some("76.8 GB/s"), Some("34.1 GB/s"), Some("25.6 GB/s"), None,
            Some("34.1 GB/s"), Some("34.1 GB/s"), Some("76.8 GB/s"), Some("12.8 GB/s"),
        ]),
        text("ECC_Memory_Supported", [
            Some("Yes"), Some("No"), Some("No"), Some("Yes"), None, Some("No"), Some("Yes"), Some("Yes"),
        ]),
        text("Processor_Graphics_", [None, Some("Intel HD Graphics 630"), Some("Intel HD Graphics 4600"), None, Some("Intel HD Graphics 630"), Some("Intel HD Graphics 510"), None, None]),
        text("Graphics_Base_Frequency", [None, Some("350 MHz"), Some("350 MHz"), None, Some("350 MHz"), Some("350 MHz"), None, None]),
        text("Graphics_Max_Dynamic_Frequency", [None, Some("1.10 GHz"), Some("1.25 GHz"), None, Some("1.10 GHz"), Some("950 MHz"), None, None]),
        text("Graphics_Video_Max_Memory", [None, Some("64 GB"), Some("1.7 GB"), None, Some("64 GB"), Some("64 GB"), None, None]),
        text("Graphics_Output", [None, Some("eDP/DP/HDMI/DVI"), Some("eDP/DP/HDMI/DVI/VGA"), None, Some("eDP/DP/HDMI/DVI"), Some("eDP/DP/HDMI/DVI"), None, None]),
        text("Support_4k", [None, Some("Yes"), Some("Yes"), None, Some("Yes"), Some("Yes"), None, None]),
        text("Max_Resolution_HDMI", [None, Some("4096x2304@24Hz"), Some("4096x2304@24Hz"), None, Some("4096x2304@24Hz"), Some("4096x2160@24Hz"), None, None]),
        text("Max_Resolution_DP", [None, Some("4096x2304@60Hz"), Some("3840x2160@60Hz"), None, Some("4096x2304@60Hz"), Some("4096x2304@60Hz"), None, None]),
        text("Max_Resolution_eDP_Integrated_Flat_Panel", [None, Some("4096x2304@60Hz"), Some("3840x2160@60Hz"), None, Some("4096x2304@60Hz"), Some("4096x2304@60Hz"), None, None]),
        text("DirectX_Support", [None, Some("12"), Some("11.2/12"), None, Some("12"), Some("12"), None, None]),
        text("OpenGL_Support", [None, Some("4.5"), Some("4.3"), None, Some("4.5"), Some("4.4"), None, None]),
        text("PCI_Express_Revision", [
            Some("3.0"), Some("3.0"), Some("3.0"), None, Some("3.0"), Some("3.0"), Some("3.0"), Some("2.0"),
        ]),
        text("PCI_Express_Configurations_", [Some("x4, x8, x16"), Some("1x16, 2x8, 1x8+2x4"), Some("1x16, 2x8"), None, Some("1x16, 2x8"), Some("1x16"), Some("x4, x8, x16"), None]),
        text("Max_nb_of_PCI_Express_Lanes", [Some("40"), Some("16"), Some("16"), Some("16"), Some("16"), None, Some("40"), Some("8")]),
        text("T", [
            Some("79°C"), Some("100°C"), Some("72.72°C"), None,
            Some("100°C"), Some("65°C"), Some("81°C"), Some("-40; 85"),
        ]),
        text("Intel_Hyper_Threading_Technology_", [
            Some("Yes"), Some("Yes"), Some("No"), None, Some("Yes"), Some("No"), Some("Yes"), Some("No"),
        ]),
        repeat("Intel_Virtualization_Technology_VTx_", "Yes"),
        text("Intel_64_", [
            Some("Yes"), Some("Yes"), Some("Yes"), Some("Yes"), Some("Yes"), None, Some("Yes"), Some("Yes"),
        ]),
        text("Instruction_Set", [
            Some("64-bit"), Some("64-bit"), Some("64-bit"), Some("64-bit"),
            Some("64-bit"), Some("64-bit"), Some("64-bit"), Some("32-bit"),
        ]),
        text("Instruction_Set_Extensions", [
            Some("SSE4.2, AVX 2.0"), Some("SSE4.1/4.2, AVX 2.0"), Some("SSE4.1/4.2, AVX 2.0"), None,
            Some("SSE4.1/4.2, AVX 2.0"), Some("SSE4.1/4.2"), Some("SSE4.2, AVX 2.0, AES"), Some("SSE4.2"),
        ]),
        repeat("Idle_States", "Yes"),
        text("Thermal_Monitoring_Technologies", [
            Some("Yes"), Some("Yes"), Some("Yes"), None, Some("Yes"), Some("Yes"), Some("Yes"), Some("Yes"),
        ]),
        text("Secure_Key", [Some("Yes"), Some("Yes"), Some("Yes"), None, Some("Yes"), Some("Yes"), Some("Yes"), None]),
        repeat("Execute_Disable_Bit", "Yes"),
    ])
    .unwrap()
}

/// Replace one column of the fixture with new cells
#[allow(dead_code)]
pub fn with_cells(df: &DataFrame, name: &str, cells: Cells) -> DataFrame {
    let mut df = df.clone();
    df.with_column(Column::new(name.into(), cells.to_vec())).unwrap();
    df
}
