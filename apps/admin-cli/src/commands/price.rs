use anyhow::Result;

use catalog_core::pricing::{PriceEdit, PriceField, PriceFields};

use super::print_json;
use crate::cli::PriceArgs;

pub fn run(args: &PriceArgs, json: bool) -> Result<()> {
    let fields = compute(args);

    if json {
        return print_json(&fields);
    }

    println!("Purchase rate  {}", fields.purchase_rate);
    println!("Margin         {:.2}%", fields.margin_percent);
    if let Some(mrp) = fields.mrp {
        println!("MRP            {}", mrp);
        if fields.is_discounted() {
            println!(
                "Discount       {:.2}% ({})",
                fields.discount_percent, fields.discount_amount
            );
        }
    }
    println!("Sales price    {}", fields.price);
    Ok(())
}

/// Applies the given inputs in form order: purchase, margin, price, MRP,
/// discount. A later input wins over what an earlier one derived.
pub fn compute(args: &PriceArgs) -> PriceFields {
    let inputs = [
        (PriceField::PurchaseRate, &args.purchase),
        (PriceField::Margin, &args.margin),
        (PriceField::Price, &args.price),
        (PriceField::Mrp, &args.mrp),
        (PriceField::DiscountPercent, &args.discount),
    ];

    let mut fields = PriceFields::default();
    for (field, raw) in inputs {
        if let Some(raw) = raw {
            fields.apply(PriceEdit::from_input(field, raw));
        }
    }

    if args.discount.is_some() {
        fields.apply(PriceEdit::Discount(true));
    }

    fields
}
