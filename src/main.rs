// Prints the promotion table and the comparison space as matrices, rows are the left operand.

use log::info;
use pixelwise::core_modules::promotion::{OperatorFamily, PROMOTION_RULES, promotion_matrix};
use pixelwise::ops::PixelType;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("{} promotion rules for {} pixel types", PROMOTION_RULES.len(), PixelType::ALL.len());

    for (family, title) in [
        (OperatorFamily::Additive, "plus / times"),
        (OperatorFamily::Comparison, "comparison space"),
    ] {
        println!("{title}");
        print!("{:>5}", "");
        for rhs in PixelType::ALL {
            print!("{:>5}", rhs.name());
        }
        println!();
        for (lhs, row) in PixelType::ALL.iter().zip(promotion_matrix(family)) {
            print!("{:>5}", lhs.name());
            for entry in row {
                print!("{:>5}", entry.map_or("-", |t| t.name()));
            }
            println!();
        }
        println!();
    }
}
